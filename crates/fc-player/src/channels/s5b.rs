//! S5B expansion: three square-wave tone channels behind an AY-style
//! address/data port pair.

use alloc::sync::Arc;

use fc_ir::{apu::regs, ChannelKind, Project, Region, SoundChip};

use super::{ChannelCursor, ChannelState};
use crate::note_tables::NoteTables;

fn write_s5b(chip: &mut dyn SoundChip, reg: u8, value: u8) {
    chip.write_register(regs::S5B_ADDR, reg);
    chip.write_register(regs::S5B_DATA, value);
}

pub struct S5bChannel {
    cursor: ChannelCursor,
    channel: u8,
}

impl S5bChannel {
    pub fn new(
        kind: ChannelKind,
        track: usize,
        region: Region,
        tables: Arc<NoteTables>,
        channel: u8,
    ) -> Self {
        Self {
            cursor: ChannelCursor::new(kind, track, region, tables),
            channel,
        }
    }
}

impl ChannelState for S5bChannel {
    fn cursor(&self) -> &ChannelCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ChannelCursor {
        &mut self.cursor
    }

    fn update_registers(&mut self, _project: &Project, chip: &mut dyn SoundChip) {
        let volume = self.cursor.volume();
        write_s5b(chip, 0x08 + self.channel, volume & 0x0F);

        if self.cursor.is_active() {
            let note = self.cursor.effective_note();
            let period = (i32::from(self.cursor.tables().s5b_period(note))
                + i32::from(self.cursor.pitch()))
            .clamp(0, 0xFFF) as u16;
            write_s5b(chip, self.channel * 2, (period & 0xFF) as u8);
            write_s5b(chip, self.channel * 2 + 1, (period >> 8) as u8);
        }
    }
}
