//! Pulse channels: the 2A03 squares and the MMC5 squares share the same
//! register layout at different base addresses.

use alloc::sync::Arc;

use fc_ir::{ChannelKind, Project, Region, SoundChip};

use super::{ChannelCursor, ChannelState};
use crate::note_tables::NoteTables;

pub struct SquareChannel {
    cursor: ChannelCursor,
    base: u16,
    /// Last value written to the period hi register. Rewriting it resets
    /// the sequencer phase, which clicks, so it only goes out on change.
    prev_hi: Option<u8>,
}

impl SquareChannel {
    pub fn new(
        kind: ChannelKind,
        track: usize,
        region: Region,
        tables: Arc<NoteTables>,
        base: u16,
    ) -> Self {
        Self {
            cursor: ChannelCursor::new(kind, track, region, tables),
            base,
            prev_hi: None,
        }
    }
}

impl ChannelState for SquareChannel {
    fn cursor(&self) -> &ChannelCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ChannelCursor {
        &mut self.cursor
    }

    fn update_registers(&mut self, _project: &Project, chip: &mut dyn SoundChip) {
        let volume = self.cursor.volume();
        let duty = self.cursor.duty() & 0x03;
        chip.write_register(self.base, 0x30 | (duty << 6) | volume);

        if self.cursor.is_active() {
            let note = self.cursor.effective_note();
            let period = (i32::from(self.cursor.tables().apu_period(note))
                + i32::from(self.cursor.pitch()))
            .clamp(0, 0x7FF) as u16;

            chip.write_register(self.base + 2, (period & 0xFF) as u8);
            let hi = (period >> 8) as u8;
            if self.prev_hi != Some(hi) {
                self.prev_hi = Some(hi);
                chip.write_register(self.base + 3, hi);
            }
        }
    }
}
