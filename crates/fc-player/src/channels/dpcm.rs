//! 2A03 DPCM channel.
//!
//! Plays project samples rather than pitched notes: each note maps to a
//! sample in the project's DPCM memory, and the DMC fetches the bytes
//! itself through the backend's sample-fetch callback.

use alloc::sync::Arc;

use fc_ir::{apu::regs, ChannelKind, Project, Region, SoundChip};

use super::{ChannelCursor, ChannelState};
use crate::note_tables::NoteTables;

pub struct DpcmChannel {
    cursor: ChannelCursor,
    was_active: bool,
}

impl DpcmChannel {
    pub fn new(kind: ChannelKind, track: usize, region: Region, tables: Arc<NoteTables>) -> Self {
        Self {
            cursor: ChannelCursor::new(kind, track, region, tables),
            was_active: false,
        }
    }
}

impl ChannelState for DpcmChannel {
    fn cursor(&self) -> &ChannelCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ChannelCursor {
        &mut self.cursor
    }

    fn update_registers(&mut self, project: &Project, chip: &mut dyn SoundChip) {
        let triggered = self.cursor.take_trigger();
        let active = self.cursor.is_active();

        if triggered {
            if let Some(sample) = project.dpcm_sample_for_note(self.cursor.note()) {
                // Restarting the DMC requires dropping its enable bit
                // first, or a sample already in flight keeps playing.
                chip.write_register(regs::SND_CHN, 0x0F);
                let loop_bit = if sample.looping { 0x40 } else { 0x00 };
                chip.write_register(regs::DMC_FREQ, loop_bit | (sample.pitch & 0x0F));
                chip.write_register(regs::DMC_START, sample.address_reg());
                chip.write_register(regs::DMC_LEN, sample.length_reg());
                chip.write_register(regs::SND_CHN, 0x1F);
            }
        } else if self.was_active && !active {
            chip.write_register(regs::SND_CHN, 0x0F);
        }

        self.was_active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{play_note, song_with_note, RecordingChip};
    use fc_ir::{DpcmSample, Note, NoteValue};

    fn dpcm() -> DpcmChannel {
        DpcmChannel::new(
            ChannelKind::Dpcm,
            0,
            Region::Ntsc,
            Arc::new(NoteTables::new(Region::Ntsc)),
        )
    }

    fn project_with_sample(note: u8) -> Project {
        let mut project = Project::new("test");
        let offset = project.sample_memory.append(&[0x12; 256]);
        project.map_dpcm_note(
            note,
            DpcmSample {
                offset,
                length: 256,
                pitch: 14,
                looping: false,
            },
        );
        project
    }

    #[test]
    fn trigger_programs_and_restarts_the_dmc() {
        let project = project_with_sample(49);
        let song = song_with_note(ChannelKind::Dpcm, Note::musical(49, 0));

        let mut chip = RecordingChip::new();
        let mut ch = dpcm();
        play_note(&mut ch, &project, &song, &mut chip);

        assert_eq!(chip.writes_to(regs::SND_CHN), [0x0F, 0x1F]);
        assert_eq!(chip.last_write(regs::DMC_FREQ), Some(14));
        assert_eq!(chip.last_write(regs::DMC_START), Some(0));
        assert_eq!(chip.last_write(regs::DMC_LEN), Some(16));
    }

    #[test]
    fn unmapped_note_writes_nothing() {
        let project = project_with_sample(49);
        let song = song_with_note(ChannelKind::Dpcm, Note::musical(50, 0));

        let mut chip = RecordingChip::new();
        let mut ch = dpcm();
        play_note(&mut ch, &project, &song, &mut chip);

        assert!(chip.writes.is_empty());
    }

    #[test]
    fn trigger_happens_once_not_every_tick() {
        let project = project_with_sample(49);
        let song = song_with_note(ChannelKind::Dpcm, Note::musical(49, 0));

        let mut chip = RecordingChip::new();
        let mut ch = dpcm();
        ch.advance(&song, 0, 0);
        for _ in 0..4 {
            ch.update_envelopes(&project);
            ch.update_registers(&project, &mut chip);
        }

        assert_eq!(chip.writes_to(regs::DMC_START).len(), 1);
    }

    #[test]
    fn stop_halts_the_dmc() {
        let project = project_with_sample(49);
        let mut song = song_with_note(ChannelKind::Dpcm, Note::musical(49, 0));
        song.track_mut(0)
            .unwrap()
            .pattern_mut(0)
            .unwrap()
            .note_mut(1)
            .unwrap()
            .value = NoteValue::Stop;

        let mut chip = RecordingChip::new();
        let mut ch = dpcm();
        play_note(&mut ch, &project, &song, &mut chip);
        chip.clear_writes();

        ch.advance(&song, 0, 1);
        ch.update_envelopes(&project);
        ch.update_registers(&project, &mut chip);

        assert_eq!(chip.writes_to(regs::SND_CHN), [0x0F]);
    }

    #[test]
    fn looping_sample_sets_the_loop_bit() {
        let mut project = Project::new("test");
        let offset = project.sample_memory.append(&[0; 64]);
        project.map_dpcm_note(
            49,
            DpcmSample {
                offset,
                length: 64,
                pitch: 8,
                looping: true,
            },
        );
        let song = song_with_note(ChannelKind::Dpcm, Note::musical(49, 0));

        let mut chip = RecordingChip::new();
        let mut ch = dpcm();
        play_note(&mut ch, &project, &song, &mut chip);

        assert_eq!(chip.last_write(regs::DMC_FREQ), Some(0x40 | 8));
    }
}
