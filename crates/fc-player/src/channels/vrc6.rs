//! VRC6 expansion channels: two pulses with 3-bit duty and a sawtooth.

use alloc::sync::Arc;

use fc_ir::{apu::regs, ChannelKind, Project, Region, SoundChip};

use super::{ChannelCursor, ChannelState};
use crate::note_tables::NoteTables;

pub struct Vrc6SquareChannel {
    cursor: ChannelCursor,
    base: u16,
}

impl Vrc6SquareChannel {
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
        }
    }
}

impl ChannelState for Vrc6SquareChannel {
    fn cursor(&self) -> &ChannelCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ChannelCursor {
        &mut self.cursor
    }

    fn update_registers(&mut self, _project: &Project, chip: &mut dyn SoundChip) {
        let volume = self.cursor.volume();
        let duty = self.cursor.duty() & 0x07;
        chip.write_register(self.base, (duty << 4) | volume);

        if self.cursor.is_active() {
            let note = self.cursor.effective_note();
            let period = (i32::from(self.cursor.tables().vrc6_pulse_period(note))
                + i32::from(self.cursor.pitch()))
            .clamp(0, 0xFFF) as u16;
            chip.write_register(self.base + 1, (period & 0xFF) as u8);
            chip.write_register(self.base + 2, 0x80 | ((period >> 8) as u8));
        } else {
            // Clearing the enable bit halts the phase accumulator.
            chip.write_register(self.base + 2, 0x00);
        }
    }
}

pub struct Vrc6SawChannel {
    cursor: ChannelCursor,
}

impl Vrc6SawChannel {
    pub fn new(kind: ChannelKind, track: usize, region: Region, tables: Arc<NoteTables>) -> Self {
        Self {
            cursor: ChannelCursor::new(kind, track, region, tables),
        }
    }
}

impl ChannelState for Vrc6SawChannel {
    fn cursor(&self) -> &ChannelCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ChannelCursor {
        &mut self.cursor
    }

    fn update_registers(&mut self, _project: &Project, chip: &mut dyn SoundChip) {
        // The saw accumulates a 6-bit rate; doubling the 0-15 volume maps
        // it onto the useful (non-distorting) half of that range.
        let rate = self.cursor.volume() * 2;
        chip.write_register(regs::VRC6_SAW_VOL, rate & 0x3F);

        if self.cursor.is_active() {
            let note = self.cursor.effective_note();
            let period = (i32::from(self.cursor.tables().vrc6_saw_period(note))
                + i32::from(self.cursor.pitch()))
            .clamp(0, 0xFFF) as u16;
            chip.write_register(regs::VRC6_SAW_LO, (period & 0xFF) as u8);
            chip.write_register(regs::VRC6_SAW_HI, 0x80 | ((period >> 8) as u8));
        } else {
            chip.write_register(regs::VRC6_SAW_HI, 0x00);
        }
    }
}
