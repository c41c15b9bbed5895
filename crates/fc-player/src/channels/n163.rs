//! N163 expansion: up to eight wavetable channels multiplexed through an
//! internal 128-byte RAM, accessed via the address/data port pair.

use alloc::sync::Arc;

use fc_ir::{apu::regs, ChannelKind, Project, Region, SoundChip};

use super::{ChannelCursor, ChannelState};
use crate::note_tables::NoteTables;

/// Default wave length in samples when the instrument carries no wave.
const DEFAULT_WAVE_SAMPLES: usize = 32;

fn write_internal(chip: &mut dyn SoundChip, addr: u8, value: u8) {
    chip.write_register(regs::N163_ADDR, addr & 0x7F);
    chip.write_register(regs::N163_DATA, value);
}

pub struct N163Channel {
    cursor: ChannelCursor,
    index: u8,
    /// Active N163 channels on the project; scales the shared clock and
    /// lands in the top register.
    active_channels: u8,
    wave_loaded: Option<u16>,
}

impl N163Channel {
    pub fn new(
        kind: ChannelKind,
        track: usize,
        region: Region,
        tables: Arc<NoteTables>,
        index: u8,
        active_channels: u8,
    ) -> Self {
        Self {
            cursor: ChannelCursor::new(kind, track, region, tables),
            index,
            active_channels: active_channels.max(1),
            wave_loaded: None,
        }
    }

    /// Base of this channel's 8-byte register block. Channel registers
    /// fill the internal RAM from the top down.
    fn reg_base(&self) -> u8 {
        0x78 - self.index * 8
    }
}

impl ChannelState for N163Channel {
    fn cursor(&self) -> &ChannelCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ChannelCursor {
        &mut self.cursor
    }

    fn update_registers(&mut self, project: &Project, chip: &mut dyn SoundChip) {
        let instrument_idx = self.cursor.instrument();
        let instrument = instrument_idx.and_then(|i| project.instrument(i));

        let mut wave_pos = 0;
        let mut wave_samples = DEFAULT_WAVE_SAMPLES;
        if let Some(inst) = instrument {
            if let Some(wave) = &inst.n163_wave {
                wave_pos = inst.n163_wave_pos;
                wave_samples = wave.len() * 2;
                if self.wave_loaded != instrument_idx {
                    for (i, packed) in wave.iter().enumerate() {
                        write_internal(chip, wave_pos.wrapping_add(i as u8), *packed);
                    }
                    self.wave_loaded = instrument_idx;
                }
            }
        }

        let base = self.reg_base();
        let volume = self.cursor.volume();
        write_internal(
            chip,
            base + 7,
            ((self.active_channels - 1) << 4) | volume,
        );

        if self.cursor.is_active() {
            let note = self.cursor.effective_note();
            // The shared clock is divided across active channels, so the
            // frequency scales up with the channel count.
            let freq = (self.cursor.tables().n163_freq(note)
                * u32::from(self.active_channels))
            .min(0x3FFFF);

            write_internal(chip, base, (freq & 0xFF) as u8);
            write_internal(chip, base + 2, ((freq >> 8) & 0xFF) as u8);
            write_internal(
                chip,
                base + 4,
                ((freq >> 16) as u8 & 0x03) | (256usize.saturating_sub(wave_samples) as u8 & 0xFC),
            );
            write_internal(chip, base + 6, wave_pos);
        }
    }
}
