//! Instrument and envelope types.

use alloc::vec::Vec;
use arrayvec::ArrayString;

/// The four per-instrument envelope slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeKind {
    Volume = 0,
    Arpeggio = 1,
    Pitch = 2,
    Duty = 3,
}

impl EnvelopeKind {
    pub const COUNT: usize = 4;

    pub const ALL: [EnvelopeKind; Self::COUNT] = [
        EnvelopeKind::Volume,
        EnvelopeKind::Arpeggio,
        EnvelopeKind::Pitch,
        EnvelopeKind::Duty,
    ];
}

/// A stepped value sequence advanced once per tick.
///
/// An empty envelope is disabled. Past the end the cursor jumps to
/// `loop_point` if set, otherwise holds the last value. `release_point`
/// marks where the cursor jumps when the note is released.
#[derive(Clone, Debug, Default)]
pub struct Envelope {
    pub values: Vec<i8>,
    pub loop_point: Option<usize>,
    pub release_point: Option<usize>,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a non-looping envelope from a value slice.
    pub fn from_values(values: &[i8]) -> Self {
        Self {
            values: values.to_vec(),
            loop_point: None,
            release_point: None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a cursor position, clamped to the last entry.
    pub fn value_at(&self, idx: usize) -> i8 {
        match self.values.get(idx) {
            Some(v) => *v,
            None => self.values.last().copied().unwrap_or(0),
        }
    }
}

/// A VRC7 patch selection: one of the 15 fixed FM patches, or patch 0 with
/// eight custom register bytes.
#[derive(Clone, Copy, Debug)]
pub struct Vrc7Patch {
    pub patch: u8,
    pub regs: [u8; 8],
}

impl Default for Vrc7Patch {
    fn default() -> Self {
        Self {
            patch: 1,
            regs: [0; 8],
        }
    }
}

/// An instrument definition: four envelopes plus expansion payloads.
#[derive(Clone, Debug, Default)]
pub struct Instrument {
    pub name: ArrayString<32>,
    envelopes: [Envelope; EnvelopeKind::COUNT],
    /// FDS wavetable (64 six-bit entries).
    pub fds_wave: Option<[u8; 64]>,
    /// N163 wavetable, packed two 4-bit samples per byte.
    pub n163_wave: Option<Vec<u8>>,
    /// N163 wave RAM position, in packed bytes.
    pub n163_wave_pos: u8,
    pub vrc7: Vrc7Patch,
}

impl Instrument {
    pub fn new(name: &str) -> Self {
        let mut inst = Self::default();
        let _ = inst.name.try_push_str(name);
        inst
    }

    pub fn envelope(&self, kind: EnvelopeKind) -> &Envelope {
        &self.envelopes[kind as usize]
    }

    pub fn set_envelope(&mut self, kind: EnvelopeKind, envelope: Envelope) {
        self.envelopes[kind as usize] = envelope;
    }

    pub fn has_envelope(&self, kind: EnvelopeKind) -> bool {
        !self.envelope(kind).is_empty()
    }
}
