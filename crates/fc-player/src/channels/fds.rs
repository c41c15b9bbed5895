//! FDS expansion: a single 64-entry wavetable channel.

use alloc::sync::Arc;

use fc_ir::{apu::regs, ChannelKind, Project, Region, SoundChip};

use super::{ChannelCursor, ChannelState};
use crate::note_tables::NoteTables;

pub struct FdsChannel {
    cursor: ChannelCursor,
    /// Instrument whose wavetable is currently in the chip's wave RAM.
    wave_loaded: Option<u16>,
}

impl FdsChannel {
    pub fn new(kind: ChannelKind, track: usize, region: Region, tables: Arc<NoteTables>) -> Self {
        Self {
            cursor: ChannelCursor::new(kind, track, region, tables),
            wave_loaded: None,
        }
    }

    fn upload_wave(&mut self, wave: &[u8; 64], chip: &mut dyn SoundChip) {
        // Wave RAM is only writable (and the channel halted) while the
        // write-enable bit is up.
        chip.write_register(regs::FDS_VOL, 0x80);
        for (i, sample) in wave.iter().enumerate() {
            chip.write_register(regs::FDS_WAV_START + i as u16, sample & 0x3F);
        }
        chip.write_register(regs::FDS_VOL, 0x00);
    }
}

impl ChannelState for FdsChannel {
    fn cursor(&self) -> &ChannelCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ChannelCursor {
        &mut self.cursor
    }

    fn update_registers(&mut self, project: &Project, chip: &mut dyn SoundChip) {
        let instrument_idx = self.cursor.instrument();
        if self.wave_loaded != instrument_idx {
            let wave = instrument_idx
                .and_then(|i| project.instrument(i))
                .and_then(|inst| inst.fds_wave);
            if let Some(wave) = wave {
                self.upload_wave(&wave, chip);
                self.wave_loaded = instrument_idx;
            }
        }

        let volume = self.cursor.volume();
        if self.cursor.is_active() && volume > 0 {
            let note = self.cursor.effective_note();
            let freq = (i32::from(self.cursor.tables().fds_freq(note))
                + i32::from(self.cursor.pitch()))
            .clamp(0, 0xFFF) as u16;

            // Direct gain: envelope disabled, 6-bit level.
            let gain = (volume * 2).min(0x3F);
            chip.write_register(regs::FDS_VOL_ENV, 0x80 | gain);
            chip.write_register(regs::FDS_FREQ_LO, (freq & 0xFF) as u8);
            chip.write_register(regs::FDS_FREQ_HI, (freq >> 8) as u8);
        } else {
            // Halt the wave unit.
            chip.write_register(regs::FDS_FREQ_HI, 0x80);
        }
    }
}
