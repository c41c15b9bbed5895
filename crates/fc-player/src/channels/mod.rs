//! Channel-state contract and shared sequencing cursor.
//!
//! Every channel kind is a small state machine behind the same
//! four-operation contract, driven in a fixed order by the player each
//! tick. The note/instrument/envelope bookkeeping is identical across
//! kinds and lives in [`ChannelCursor`]; what differs is how the resulting
//! volume and pitch become register writes.

pub(crate) mod dpcm;
pub(crate) mod fds;
pub(crate) mod n163;
pub(crate) mod noise;
pub(crate) mod s5b;
pub(crate) mod square;
pub(crate) mod triangle;
pub(crate) mod vrc6;
pub(crate) mod vrc7;

use alloc::sync::Arc;

use fc_ir::{
    ChannelKind, Effect, EnvelopeKind, Note, NoteValue, Project, Region, Song, SoundChip,
    NOTE_MAX, NOTE_MIN,
};

use crate::note_tables::NoteTables;

/// The four-operation contract every channel kind implements.
///
/// The player calls these in fixed order: `advance` and `process_effects`
/// once per musical step, `update_envelopes` and `update_registers` once
/// per tick (envelopes evolve faster than musical steps).
pub trait ChannelState: Send {
    fn cursor(&self) -> &ChannelCursor;
    fn cursor_mut(&mut self) -> &mut ChannelCursor;

    /// Load the note at this position into the sequencing cursor.
    fn advance(&mut self, song: &Song, pattern: usize, note: usize) {
        self.cursor_mut().advance(song, pattern, note);
    }

    /// Apply effect commands at this position. `speed` is the shared
    /// playback speed; a speed effect on any channel rewrites it.
    fn process_effects(&mut self, song: &Song, pattern: usize, note: usize, speed: &mut u8) {
        self.cursor_mut().process_effects(song, pattern, note, speed);
    }

    /// Advance the per-tick instrument envelopes.
    fn update_envelopes(&mut self, project: &Project) {
        self.cursor_mut().update_envelopes(project);
    }

    /// Push the channel's current state to the backend registers.
    fn update_registers(&mut self, project: &Project, chip: &mut dyn SoundChip);
}

/// Default envelope outputs when an instrument doesn't define one.
fn default_env_value(kind: EnvelopeKind) -> i8 {
    match kind {
        EnvelopeKind::Volume => 15,
        _ => 0,
    }
}

/// Shared per-channel sequencing state: which note and instrument are
/// held, and where each instrument envelope's cursor sits.
pub struct ChannelCursor {
    kind: ChannelKind,
    track: usize,
    region: Region,
    tables: Arc<NoteTables>,
    /// Current note (0 = silent).
    note: u8,
    instrument: Option<u16>,
    triggered: bool,
    released: bool,
    env_idx: [usize; EnvelopeKind::COUNT],
    env_value: [i8; EnvelopeKind::COUNT],
}

impl ChannelCursor {
    pub fn new(kind: ChannelKind, track: usize, region: Region, tables: Arc<NoteTables>) -> Self {
        Self {
            kind,
            track,
            region,
            tables,
            note: 0,
            instrument: None,
            triggered: false,
            released: false,
            env_idx: [0; EnvelopeKind::COUNT],
            env_value: [0; EnvelopeKind::COUNT],
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn track(&self) -> usize {
        self.track
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn tables(&self) -> &NoteTables {
        &self.tables
    }

    /// The note currently held (0 when silent).
    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn instrument(&self) -> Option<u16> {
        self.instrument
    }

    /// Whether the channel currently holds a note.
    pub fn is_active(&self) -> bool {
        self.note != 0
    }

    /// Consume the "new note this step" flag. Kinds that must retrigger
    /// hardware (DPCM start, VRC7 key-on, wavetable uploads) read this
    /// once per step.
    pub fn take_trigger(&mut self) -> bool {
        core::mem::take(&mut self.triggered)
    }

    fn note_at<'a>(&self, song: &'a Song, pattern: usize, note: usize) -> Option<&'a Note> {
        song.track(self.track)?.pattern(pattern)?.note(note)
    }

    fn advance(&mut self, song: &Song, pattern: usize, note_idx: usize) {
        let Some(note) = self.note_at(song, pattern, note_idx) else {
            return;
        };

        if let Some(instrument) = note.instrument {
            self.instrument = Some(instrument);
        }

        match note.value {
            NoteValue::Musical(n) => {
                self.note = n;
                self.triggered = true;
                self.released = false;
                self.env_idx = [0; EnvelopeKind::COUNT];
            }
            NoteValue::Stop => self.note = 0,
            NoteValue::Release => self.released = true,
            NoteValue::None => {}
        }
    }

    fn process_effects(&mut self, song: &Song, pattern: usize, note_idx: usize, speed: &mut u8) {
        let Some(note) = self.note_at(song, pattern, note_idx) else {
            return;
        };
        if let Effect::Speed(s) = note.effect {
            if s > 0 {
                *speed = s;
            }
        }
    }

    fn update_envelopes(&mut self, project: &Project) {
        let instrument = self.instrument.and_then(|i| project.instrument(i));

        for kind in EnvelopeKind::ALL {
            let slot = kind as usize;
            let env = match instrument {
                Some(inst) if inst.has_envelope(kind) => inst.envelope(kind),
                _ => {
                    self.env_value[slot] = default_env_value(kind);
                    continue;
                }
            };

            if self.released {
                if let Some(release) = env.release_point {
                    if self.env_idx[slot] < release {
                        self.env_idx[slot] = release;
                    }
                }
            }

            self.env_value[slot] = env.value_at(self.env_idx[slot]);

            let len = env.len();
            let next = self.env_idx[slot] + 1;
            self.env_idx[slot] = match env.release_point {
                // Sustain region: hold or loop before the release point.
                Some(release) if !self.released => {
                    let sustain_end = release.min(len);
                    if next >= sustain_end {
                        env.loop_point.unwrap_or(sustain_end.saturating_sub(1))
                    } else {
                        next
                    }
                }
                // Released past a release point: play out and hold.
                Some(_) if next >= len => len - 1,
                // No release point: ordinary loop-or-hold.
                None if next >= len => env.loop_point.unwrap_or(len - 1),
                _ => next,
            };
        }
    }

    /// Latched envelope output for this tick.
    pub fn envelope_value(&self, kind: EnvelopeKind) -> i8 {
        self.env_value[kind as usize]
    }

    /// Channel volume for this tick (0-15); silent channels report 0.
    pub fn volume(&self) -> u8 {
        if self.note == 0 {
            0
        } else {
            self.env_value[EnvelopeKind::Volume as usize].clamp(0, 15) as u8
        }
    }

    /// Note after applying the arpeggio envelope, clamped to the playable
    /// range.
    pub fn effective_note(&self) -> u8 {
        let shifted =
            i16::from(self.note) + i16::from(self.env_value[EnvelopeKind::Arpeggio as usize]);
        shifted.clamp(i16::from(NOTE_MIN), i16::from(NOTE_MAX)) as u8
    }

    /// Pitch envelope output, in period register units.
    pub fn pitch(&self) -> i16 {
        i16::from(self.env_value[EnvelopeKind::Pitch as usize])
    }

    /// Duty envelope output.
    pub fn duty(&self) -> u8 {
        self.env_value[EnvelopeKind::Duty as usize].max(0) as u8
    }
}
