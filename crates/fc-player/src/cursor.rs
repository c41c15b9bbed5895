//! Song-position cursor and loop policy.

use fc_ir::Song;

/// What happens when playback reaches the end of the song.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopMode {
    /// Stop at the end unless the song has a loop point.
    None = 0,
    /// Always loop, jumping to the loop point (or the start).
    #[default]
    Song = 1,
    /// Repeat the current pattern forever; the pattern index never moves.
    Pattern = 2,
}

impl LoopMode {
    pub const COUNT: usize = 3;

    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => LoopMode::None,
            2 => LoopMode::Pattern,
            _ => LoopMode::Song,
        }
    }
}

/// Position within a song: pattern slot and note row.
///
/// The absolute frame position is derived and published for observers (a
/// position indicator, a seek target check); playback itself only ever
/// consumes `pattern` and `note`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    pub pattern: usize,
    pub note: usize,
}

impl PlaybackCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute note index: the pattern's start offset plus the note row.
    pub fn absolute_note(&self, song: &Song) -> u32 {
        song.pattern_start_note(self.pattern) + self.note as u32
    }

    /// Advance one musical step, applying the loop policy at pattern and
    /// song boundaries. Returns false only at end of song under
    /// `LoopMode::None` with no loop point.
    pub fn advance(&mut self, song: &Song, loop_mode: LoopMode) -> bool {
        self.note += 1;
        if self.note >= song.pattern_length(self.pattern) as usize {
            self.note = 0;
            if loop_mode != LoopMode::Pattern {
                self.pattern += 1;
            }
        }

        if self.pattern >= song.length() {
            match loop_mode {
                LoopMode::None => match song.loop_point {
                    Some(loop_point) => {
                        self.pattern = loop_point;
                        self.note = 0;
                    }
                    None => return false,
                },
                LoopMode::Song => {
                    self.pattern = song.loop_point.unwrap_or(0);
                    self.note = 0;
                }
                // Unreachable while pinned: the pattern index never moves.
                LoopMode::Pattern => {}
            }
        }

        true
    }
}
