//! 2A03 triangle channel.
//!
//! The triangle has no volume control; it is keyed on and off through the
//! linear counter and always plays at full amplitude.

use alloc::sync::Arc;

use fc_ir::{apu::regs, ChannelKind, Project, Region, SoundChip};

use super::{ChannelCursor, ChannelState};
use crate::note_tables::NoteTables;

pub struct TriangleChannel {
    cursor: ChannelCursor,
}

impl TriangleChannel {
    pub fn new(kind: ChannelKind, track: usize, region: Region, tables: Arc<NoteTables>) -> Self {
        Self {
            cursor: ChannelCursor::new(kind, track, region, tables),
        }
    }
}

impl ChannelState for TriangleChannel {
    fn cursor(&self) -> &ChannelCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ChannelCursor {
        &mut self.cursor
    }

    fn update_registers(&mut self, _project: &Project, chip: &mut dyn SoundChip) {
        // Any nonzero envelope volume keys the channel on.
        if self.cursor.volume() > 0 {
            let note = self.cursor.effective_note();
            let period = (i32::from(self.cursor.tables().apu_period(note))
                + i32::from(self.cursor.pitch()))
            .clamp(0, 0x7FF) as u16;

            chip.write_register(regs::TRI_LINEAR, 0x81);
            chip.write_register(regs::TRI_LO, (period & 0xFF) as u8);
            chip.write_register(regs::TRI_HI, (period >> 8) as u8);
        } else {
            chip.write_register(regs::TRI_LINEAR, 0x80);
        }
    }
}
