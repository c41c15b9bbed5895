//! Song structure: pattern slots, per-channel tracks, loop point.

use alloc::vec::Vec;
use arrayvec::ArrayString;

use crate::channel::ChannelKind;
use crate::pattern::Pattern;

/// One channel's column through a song: one pattern per song slot.
#[derive(Clone, Debug)]
pub struct Track {
    pub channel: ChannelKind,
    patterns: Vec<Pattern>,
}

impl Track {
    /// Create a track with `length` empty patterns of `pattern_length` rows.
    pub fn new(channel: ChannelKind, length: usize, pattern_length: u16) -> Self {
        Self {
            channel,
            patterns: (0..length).map(|_| Pattern::new(pattern_length)).collect(),
        }
    }

    pub fn pattern(&self, idx: usize) -> Option<&Pattern> {
        self.patterns.get(idx)
    }

    pub fn pattern_mut(&mut self, idx: usize) -> Option<&mut Pattern> {
        self.patterns.get_mut(idx)
    }
}

/// A complete song: ordered pattern slots across one track per active
/// channel, plus initial tempo configuration. Immutable during playback;
/// the player references it, never copies it.
#[derive(Clone, Debug)]
pub struct Song {
    pub name: ArrayString<32>,
    /// Initial accumulator-tempo speed (ticks per musical step).
    pub speed: u8,
    /// Initial accumulator-tempo tempo (BPM-scaled).
    pub tempo: u8,
    /// Pattern slot the song jumps back to at the end, if any.
    pub loop_point: Option<usize>,
    pattern_lengths: Vec<u16>,
    /// Absolute note index each slot starts at (prefix sums, cached).
    start_notes: Vec<u32>,
    tracks: Vec<Track>,
}

impl Song {
    /// Create a song of `length` slots, `pattern_length` rows each, with
    /// one track per channel kind given.
    pub fn new(name: &str, channels: &[ChannelKind], length: usize, pattern_length: u16) -> Self {
        let mut song = Self {
            name: ArrayString::new(),
            speed: 6,
            tempo: 150,
            loop_point: None,
            pattern_lengths: alloc::vec![pattern_length; length],
            start_notes: Vec::new(),
            tracks: channels
                .iter()
                .map(|&c| Track::new(c, length, pattern_length))
                .collect(),
        };
        let _ = song.name.try_push_str(name);
        song.rebuild_start_notes();
        song
    }

    /// Number of pattern slots.
    pub fn length(&self) -> usize {
        self.pattern_lengths.len()
    }

    /// Rows in one pattern slot.
    pub fn pattern_length(&self, idx: usize) -> u16 {
        self.pattern_lengths.get(idx).copied().unwrap_or(0)
    }

    /// Absolute note index a slot starts at. Past the last slot this is
    /// the total note count.
    pub fn pattern_start_note(&self, idx: usize) -> u32 {
        match self.start_notes.get(idx) {
            Some(n) => *n,
            None => self.total_notes(),
        }
    }

    /// Total notes across all slots.
    pub fn total_notes(&self) -> u32 {
        self.start_notes.last().copied().unwrap_or(0)
            + u32::from(self.pattern_lengths.last().copied().unwrap_or(0))
    }

    /// Change one slot's row count, resizing every track's pattern there.
    pub fn set_pattern_length(&mut self, idx: usize, length: u16) {
        if let Some(slot) = self.pattern_lengths.get_mut(idx) {
            *slot = length;
            for track in &mut self.tracks {
                if let Some(pattern) = track.pattern_mut(idx) {
                    pattern.resize(length);
                }
            }
            self.rebuild_start_notes();
        }
    }

    fn rebuild_start_notes(&mut self) {
        self.start_notes.clear();
        let mut total: u32 = 0;
        for len in &self.pattern_lengths {
            self.start_notes.push(total);
            total += u32::from(*len);
        }
    }

    pub fn track(&self, idx: usize) -> Option<&Track> {
        self.tracks.get(idx)
    }

    pub fn track_mut(&mut self, idx: usize) -> Option<&mut Track> {
        self.tracks.get_mut(idx)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}
