//! The player: a frame-driven sequencer state machine.
//!
//! One `play_frame` call renders one audio frame: the tempo engine decides
//! how many logical ticks the frame spans, musical steps advance the
//! cursor and feed every channel state, envelopes and register writes run
//! every tick, and the frame ends with the mute mask and a sample readout
//! from the backend.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use fc_ir::{Project, Region, SoundChip, SAMPLE_RATE};
use log::debug;

use crate::cursor::{LoopMode, PlaybackCursor};
use crate::factory::{create_channel_states, ChannelRoster};
use crate::tempo::TempoEngine;

/// Where the player is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// No song bound.
    Idle,
    /// Fast-forwarding to the requested start note, audio suppressed.
    Seeking,
    Playing,
    /// Reached the end of the song with nothing left to play.
    Stopped,
}

/// Errors from binding a song for playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerError {
    /// The project has no song at this index.
    NoSuchSong(usize),
    /// The requested start note lies beyond the reachable song content.
    SeekTarget { target: u32 },
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerError::NoSuchSong(idx) => write!(f, "no song at index {}", idx),
            PlayerError::SeekTarget { target } => {
                write!(f, "cannot seek to note {}: song ends first", target)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlayerError {}

/// Control state shared with a UI/control thread. Each field is read at
/// most once per frame by the audio thread; writes land one frame late at
/// worst.
struct Shared {
    channel_mask: AtomicU32,
    loop_mode: AtomicU8,
    position: AtomicU32,
}

impl Shared {
    fn new() -> Self {
        Self {
            channel_mask: AtomicU32::new(0xFFFF),
            loop_mode: AtomicU8::new(LoopMode::Song as u8),
            position: AtomicU32::new(0),
        }
    }

    fn channel_mask_value(&self) -> u32 {
        self.channel_mask.load(Ordering::Relaxed)
    }

    fn loop_mode_value(&self) -> LoopMode {
        LoopMode::from_u8(self.loop_mode.load(Ordering::Relaxed))
    }
}

/// Cloneable control handle for the thread that isn't rendering audio:
/// mute mask, loop mode, and the published playback position.
#[derive(Clone)]
pub struct PlayerHandle {
    shared: Arc<Shared>,
}

impl PlayerHandle {
    pub fn channel_mask(&self) -> u32 {
        self.shared.channel_mask_value()
    }

    pub fn set_channel_mask(&self, mask: u32) {
        self.shared.channel_mask.store(mask, Ordering::Relaxed);
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.shared.loop_mode_value()
    }

    pub fn set_loop_mode(&self, mode: LoopMode) {
        self.shared.loop_mode.store(mode as u8, Ordering::Relaxed);
    }

    /// Absolute note index the player last published.
    pub fn position(&self) -> u32 {
        self.shared.position.load(Ordering::Relaxed)
    }
}

/// Frame-accurate song player driving a [`SoundChip`] backend.
pub struct Player {
    chip: Box<dyn SoundChip>,
    shared: Arc<Shared>,
    state: PlayerState,
    project: Option<Arc<Project>>,
    song_index: usize,
    region: Region,
    tempo: TempoEngine,
    channels: ChannelRoster,
    cursor: PlaybackCursor,
    /// Shared playback speed; speed effects on any channel rewrite it.
    speed: u8,
    /// The first tick of a session steps without advancing the cursor.
    first_frame: bool,
    sample_buf: Vec<i16>,
}

impl Player {
    pub fn new(chip: Box<dyn SoundChip>) -> Self {
        Self {
            chip,
            shared: Arc::new(Shared::new()),
            state: PlayerState::Idle,
            project: None,
            song_index: 0,
            region: Region::Ntsc,
            tempo: TempoEngine::new(Default::default(), Region::Ntsc),
            channels: ChannelRoster::new(),
            cursor: PlaybackCursor::new(),
            speed: 6,
            first_frame: true,
            sample_buf: Vec::new(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Refresh standard of the current session.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Control handle for a UI/control thread.
    pub fn handle(&self) -> PlayerHandle {
        PlayerHandle {
            shared: self.shared.clone(),
        }
    }

    pub fn channel_mask(&self) -> u32 {
        self.shared.channel_mask_value()
    }

    pub fn set_channel_mask(&self, mask: u32) {
        self.shared.channel_mask.store(mask, Ordering::Relaxed);
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.shared.loop_mode_value()
    }

    pub fn set_loop_mode(&self, mode: LoopMode) {
        self.shared.loop_mode.store(mode as u8, Ordering::Relaxed);
    }

    /// Absolute note index of the published cursor.
    pub fn position(&self) -> u32 {
        self.shared.position.load(Ordering::Relaxed)
    }

    /// Bind a song and prepare a playback session.
    ///
    /// Selects the tempo mode from the project, resets the backend for the
    /// region and expansion configuration, and builds the channel roster.
    /// A nonzero `start_note` fast-forwards (without audio) until the
    /// cursor reaches that absolute note; if the song ends with no loop
    /// before getting there, no session is left active. The seek cost is
    /// proportional to the notes skipped, so hosts should bind songs off
    /// the audio thread.
    pub fn begin_play_song(
        &mut self,
        project: Arc<Project>,
        song_index: usize,
        region: Region,
        start_note: u32,
    ) -> Result<(), PlayerError> {
        self.state = PlayerState::Idle;
        self.project = None;

        let song = project
            .song(song_index)
            .ok_or(PlayerError::NoSuchSong(song_index))?;

        self.song_index = song_index;
        self.region = region;
        self.speed = song.speed;
        self.tempo = TempoEngine::new(project.tempo_mode, region);
        self.cursor = PlaybackCursor::new();
        self.first_frame = true;
        self.shared.position.store(start_note, Ordering::Relaxed);

        self.channels = create_channel_states(&project, region);
        self.chip.reset(
            SAMPLE_RATE,
            region,
            project.expansion,
            project.expansion_channel_count(),
            project.clone(),
        );

        // The per-frame path reuses this buffer; a double-tick frame can
        // carry two frames' worth of samples.
        self.sample_buf.clear();
        self.sample_buf
            .reserve(region.samples_per_frame(SAMPLE_RATE) * 2);

        debug!(
            "begin song '{}': {:?}, {:?} tempo, {} channels, start note {}",
            song.name,
            region,
            project.tempo_mode,
            self.channels.len(),
            start_note
        );

        if start_note != 0 {
            self.state = PlayerState::Seeking;
            self.chip.begin_seek();
            let loop_mode = self.shared.loop_mode_value();

            while self.cursor.absolute_note(song) < start_note {
                let (pattern, note) = (self.cursor.pattern, self.cursor.note);
                let mut speed = self.speed;
                for channel in self.channels.iter_mut() {
                    channel.advance(song, pattern, note);
                    channel.process_effects(song, pattern, note, &mut speed);
                }
                self.speed = speed;

                // A loop jump moves the cursor backward; the target can
                // never be reached once that happens.
                let before = self.cursor.absolute_note(song);
                if !self.cursor.advance(song, loop_mode)
                    || self.cursor.absolute_note(song) <= before
                {
                    self.chip.end_seek();
                    self.state = PlayerState::Idle;
                    self.channels.clear();
                    return Err(PlayerError::SeekTarget { target: start_note });
                }
            }

            self.chip.end_seek();
            debug!(
                "seek landed on pattern {} note {}",
                self.cursor.pattern, self.cursor.note
            );
        }

        self.project = Some(project);
        self.state = PlayerState::Playing;
        Ok(())
    }

    /// Render one audio frame. Returns the frame's samples, or `None` once
    /// playback has ended (the caller must stop invoking this).
    pub fn play_frame(&mut self) -> Option<&[i16]> {
        #[cfg(feature = "alloc_check")]
        let ok = assert_no_alloc::assert_no_alloc(|| self.run_frame());
        #[cfg(not(feature = "alloc_check"))]
        let ok = self.run_frame();

        if ok {
            Some(&self.sample_buf)
        } else {
            None
        }
    }

    fn run_frame(&mut self) -> bool {
        if self.state != PlayerState::Playing {
            return false;
        }
        let Some(project) = self.project.clone() else {
            return false;
        };
        let Some(song) = project.song(self.song_index) else {
            return false;
        };

        // One consistent read per frame; control-thread writes land a
        // frame late at worst.
        let loop_mode = self.shared.loop_mode_value();
        let ticks = self.tempo.ticks_for_frame();

        for _ in 0..ticks {
            if self.first_frame || self.tempo.update(self.speed, song.tempo) {
                if !self.first_frame && !self.cursor.advance(song, loop_mode) {
                    self.state = PlayerState::Stopped;
                    return false;
                }

                let (pattern, note) = (self.cursor.pattern, self.cursor.note);
                let mut speed = self.speed;
                for channel in self.channels.iter_mut() {
                    channel.advance(song, pattern, note);
                    channel.process_effects(song, pattern, note, &mut speed);
                }
                self.speed = speed;

                self.shared
                    .position
                    .store(self.cursor.absolute_note(song), Ordering::Relaxed);
                self.first_frame = false;
            }

            // Envelopes and register pushes run every tick, step or not:
            // pitch/volume envelopes evolve faster than musical steps.
            for channel in self.channels.iter_mut() {
                channel.update_envelopes(&project);
                channel.update_registers(&project, self.chip.as_mut());
            }
        }

        let mask = self.shared.channel_mask_value();
        for i in 0..self.channels.len() {
            self.chip.set_channel_enabled(i, mask & (1 << i) != 0);
        }

        self.chip.end_frame();
        let available = self.chip.samples_available();
        self.sample_buf.resize(available, 0);
        let read = self.chip.read_samples(&mut self.sample_buf);
        self.sample_buf.truncate(read);
        true
    }

    /// Tear down the current session, if any.
    pub fn shutdown(&mut self) {
        self.state = PlayerState::Idle;
        self.project = None;
        self.channels.clear();
    }
}
