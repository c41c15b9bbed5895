//! Project: the top-level container the player binds to.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use arrayvec::ArrayString;

use crate::apu::DmcSource;
use crate::channel::{ChannelKind, Expansion};
use crate::dpcm::{DpcmSample, SampleMemory};
use crate::instrument::Instrument;
use crate::song::Song;

/// Which of the two tempo models governs a project's songs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TempoMode {
    /// Ratio-accumulator tempo: one tick per frame, steps gated by the
    /// classic tracker speed/tempo arithmetic.
    #[default]
    FamiTracker,
    /// Native engine tempo: steps on every tick, with the tick count per
    /// frame dilated to compensate for the refresh rate.
    Native,
}

/// A complete project: expansion configuration, tempo mode, instruments,
/// DPCM memory, and songs. Immutable while a song is playing.
#[derive(Clone, Debug, Default)]
pub struct Project {
    pub name: ArrayString<32>,
    pub expansion: Expansion,
    /// Configured N163 channel count (1-8); ignored for other families.
    pub expansion_channels: u8,
    pub tempo_mode: TempoMode,
    pub instruments: Vec<Instrument>,
    pub sample_memory: SampleMemory,
    dpcm_map: BTreeMap<u8, DpcmSample>,
    pub songs: Vec<Song>,
}

impl Project {
    /// Create a project with no expansion audio.
    pub fn new(name: &str) -> Self {
        let mut project = Self::default();
        let _ = project.name.try_push_str(name);
        project
    }

    /// Create a project with an expansion family enabled.
    ///
    /// `channels` only matters for N163 (clamped to 1-8); other families
    /// contribute their fixed channel count.
    pub fn with_expansion(name: &str, expansion: Expansion, channels: u8) -> Self {
        let mut project = Self::new(name);
        project.expansion = expansion;
        project.expansion_channels = match expansion {
            Expansion::N163 => channels.clamp(1, 8),
            other => other.max_channels(),
        };
        project
    }

    /// How many channels the enabled expansion contributes.
    pub fn expansion_channel_count(&self) -> u8 {
        match self.expansion {
            Expansion::None => 0,
            Expansion::N163 => self.expansion_channels.clamp(1, 8),
            other => other.max_channels(),
        }
    }

    /// Whether a channel kind is active under this project's configuration.
    pub fn is_channel_active(&self, kind: ChannelKind) -> bool {
        match kind.expansion() {
            Expansion::None => true,
            e if e == self.expansion => {
                kind.expansion_channel_index() < self.expansion_channel_count()
            }
            _ => false,
        }
    }

    /// Active channel kinds, in canonical roster order.
    pub fn active_channels(&self) -> impl Iterator<Item = ChannelKind> + '_ {
        ChannelKind::ALL
            .into_iter()
            .filter(|kind| self.is_channel_active(*kind))
    }

    pub fn active_channel_count(&self) -> usize {
        self.active_channels().count()
    }

    pub fn song(&self, idx: usize) -> Option<&Song> {
        self.songs.get(idx)
    }

    pub fn instrument(&self, idx: u16) -> Option<&Instrument> {
        self.instruments.get(idx as usize)
    }

    /// Map a note to a DPCM sample (the DPCM channel plays samples, not
    /// pitched notes).
    pub fn map_dpcm_note(&mut self, note: u8, sample: DpcmSample) {
        self.dpcm_map.insert(note, sample);
    }

    pub fn dpcm_sample_for_note(&self, note: u8) -> Option<&DpcmSample> {
        self.dpcm_map.get(&note)
    }
}

impl DmcSource for Project {
    fn read_sample_byte(&self, addr: u16) -> u8 {
        self.sample_memory.byte_at(addr)
    }
}
