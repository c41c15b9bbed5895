//! VRC7 expansion: six 2-operator FM channels behind an indexed register
//! port pair.

use alloc::sync::Arc;

use fc_ir::{apu::regs, ChannelKind, Project, Region, SoundChip};

use super::{ChannelCursor, ChannelState};
use crate::note_tables::NoteTables;

const KEY_ON: u8 = 0x10;
const SUSTAIN: u8 = 0x20;

fn write_fm(chip: &mut dyn SoundChip, reg: u8, value: u8) {
    chip.write_register(regs::VRC7_REG_SEL, reg);
    chip.write_register(regs::VRC7_REG_WRITE, value);
}

pub struct Vrc7Channel {
    cursor: ChannelCursor,
    channel: u8,
    /// Last $20-range value written, so key-off can clear the trigger bit
    /// without touching the octave/fnum fields.
    prev_ctrl: u8,
    key_on: bool,
}

impl Vrc7Channel {
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
            prev_ctrl: 0,
            key_on: false,
        }
    }
}

impl ChannelState for Vrc7Channel {
    fn cursor(&self) -> &ChannelCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ChannelCursor {
        &mut self.cursor
    }

    fn update_registers(&mut self, project: &Project, chip: &mut dyn SoundChip) {
        let triggered = self.cursor.take_trigger();
        let volume = self.cursor.volume();

        if !self.cursor.is_active() || volume == 0 {
            if self.key_on {
                write_fm(chip, 0x20 + self.channel, self.prev_ctrl & !KEY_ON);
                self.key_on = false;
            }
            return;
        }

        let instrument = self.cursor.instrument().and_then(|i| project.instrument(i));
        let patch = instrument.map(|i| i.vrc7.patch).unwrap_or(1);

        if triggered {
            // Patch 0 is the chip's writable custom patch.
            if patch == 0 {
                if let Some(inst) = instrument {
                    for (reg, value) in inst.vrc7.regs.iter().enumerate() {
                        write_fm(chip, reg as u8, *value);
                    }
                }
            }
            // Retrigger: the envelope only restarts on a key-off → key-on
            // transition.
            if self.key_on {
                write_fm(chip, 0x20 + self.channel, self.prev_ctrl & !KEY_ON);
            }
        }

        let (octave, fnum) = self.cursor.tables().vrc7_note(self.cursor.effective_note());
        write_fm(chip, 0x10 + self.channel, (fnum & 0xFF) as u8);
        write_fm(
            chip,
            0x30 + self.channel,
            (patch << 4) | (15 - volume),
        );

        let ctrl = KEY_ON | SUSTAIN | (octave << 1) | ((fnum >> 8) & 1) as u8;
        write_fm(chip, 0x20 + self.channel, ctrl);
        self.prev_ctrl = ctrl;
        self.key_on = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{play_note, song_with_note, RecordingChip};
    use fc_ir::{Instrument, Note, NoteValue};

    fn vrc7(channel: u8) -> Vrc7Channel {
        Vrc7Channel::new(
            ChannelKind::Vrc7Fm1,
            0,
            Region::Ntsc,
            Arc::new(NoteTables::new(Region::Ntsc)),
            channel,
        )
    }

    /// Reconstruct (register, value) pairs from the indexed port writes.
    fn fm_writes(chip: &RecordingChip) -> alloc::vec::Vec<(u8, u8)> {
        let mut pairs = alloc::vec::Vec::new();
        let mut selected = None;
        for (addr, value) in &chip.writes {
            match *addr {
                regs::VRC7_REG_SEL => selected = Some(*value),
                regs::VRC7_REG_WRITE => {
                    if let Some(reg) = selected {
                        pairs.push((reg, *value));
                    }
                }
                _ => {}
            }
        }
        pairs
    }

    fn last_fm(chip: &RecordingChip, reg: u8) -> Option<u8> {
        fm_writes(chip)
            .iter()
            .rev()
            .find(|(r, _)| *r == reg)
            .map(|(_, v)| *v)
    }

    #[test]
    fn note_on_keys_the_channel() {
        let mut project = Project::new("test");
        project.instruments.push(Instrument::new("fm"));
        let song = song_with_note(ChannelKind::Vrc7Fm1, Note::musical(58, 0));

        let mut chip = RecordingChip::new();
        let mut ch = vrc7(0);
        play_note(&mut ch, &project, &song, &mut chip);

        let ctrl = last_fm(&chip, 0x20).unwrap();
        assert_eq!(ctrl & KEY_ON, KEY_ON);
        assert_eq!(ctrl & SUSTAIN, SUSTAIN);
        // Default patch 1, full volume → zero attenuation.
        assert_eq!(last_fm(&chip, 0x30), Some(0x10));
    }

    #[test]
    fn stop_clears_only_the_key_bit() {
        let mut project = Project::new("test");
        project.instruments.push(Instrument::new("fm"));
        let mut song = song_with_note(ChannelKind::Vrc7Fm1, Note::musical(58, 0));
        song.track_mut(0)
            .unwrap()
            .pattern_mut(0)
            .unwrap()
            .note_mut(1)
            .unwrap()
            .value = NoteValue::Stop;

        let mut chip = RecordingChip::new();
        let mut ch = vrc7(0);
        play_note(&mut ch, &project, &song, &mut chip);
        let ctrl_on = last_fm(&chip, 0x20).unwrap();

        ch.advance(&song, 0, 1);
        ch.update_envelopes(&project);
        ch.update_registers(&project, &mut chip);

        let ctrl_off = last_fm(&chip, 0x20).unwrap();
        assert_eq!(ctrl_off, ctrl_on & !KEY_ON);
    }

    #[test]
    fn custom_patch_uploads_registers_on_trigger() {
        let mut inst = Instrument::new("custom");
        inst.vrc7.patch = 0;
        inst.vrc7.regs = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut project = Project::new("test");
        project.instruments.push(inst);
        let song = song_with_note(ChannelKind::Vrc7Fm1, Note::musical(58, 0));

        let mut chip = RecordingChip::new();
        let mut ch = vrc7(0);
        play_note(&mut ch, &project, &song, &mut chip);

        let pairs = fm_writes(&chip);
        for reg in 0..8u8 {
            assert!(pairs.contains(&(reg, reg + 1)));
        }
    }

    #[test]
    fn channel_index_offsets_the_registers() {
        let mut project = Project::new("test");
        project.instruments.push(Instrument::new("fm"));
        let song = song_with_note(ChannelKind::Vrc7Fm3, Note::musical(58, 0));

        let mut chip = RecordingChip::new();
        let mut ch = vrc7(2);
        play_note(&mut ch, &project, &song, &mut chip);

        assert!(last_fm(&chip, 0x12).is_some());
        assert!(last_fm(&chip, 0x22).is_some());
        assert!(last_fm(&chip, 0x32).is_some());
        assert!(last_fm(&chip, 0x10).is_none());
    }
}
