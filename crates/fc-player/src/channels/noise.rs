//! 2A03 noise channel.

use alloc::sync::Arc;

use fc_ir::{apu::regs, ChannelKind, Project, Region, SoundChip};

use super::{ChannelCursor, ChannelState};
use crate::note_tables::NoteTables;

pub struct NoiseChannel {
    cursor: ChannelCursor,
}

impl NoiseChannel {
    pub fn new(kind: ChannelKind, track: usize, region: Region, tables: Arc<NoteTables>) -> Self {
        Self {
            cursor: ChannelCursor::new(kind, track, region, tables),
        }
    }
}

impl ChannelState for NoiseChannel {
    fn cursor(&self) -> &ChannelCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ChannelCursor {
        &mut self.cursor
    }

    fn update_registers(&mut self, _project: &Project, chip: &mut dyn SoundChip) {
        let volume = self.cursor.volume();
        chip.write_register(regs::NOISE_VOL, 0x30 | volume);

        if self.cursor.is_active() {
            // The low nibble of the note picks one of the 16 hardware
            // periods; higher notes select faster (smaller) periods. The
            // duty envelope's low bit selects the short (tonal) LFSR mode.
            let note = self.cursor.effective_note();
            let period = (note & 0x0F) ^ 0x0F;
            let mode = (self.cursor.duty() & 0x01) << 7;
            chip.write_register(regs::NOISE_PERIOD, mode | period);
            chip.write_register(regs::NOISE_LEN, 0x00);
        }
    }
}
