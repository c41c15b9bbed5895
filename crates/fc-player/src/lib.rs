//! Playback engine for the famicore NES music player.
//!
//! Drives a song one rendered audio frame at a time: the tempo engine
//! decides how many logical ticks the frame spans, each tick advances the
//! per-channel state machines, and the frame ends with register writes,
//! the mute mask, and a sample readout from the synthesis backend.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod channels;
mod cursor;
mod factory;
mod note_tables;
mod player;
mod tempo;

#[cfg(test)]
mod testing;

pub use channels::{ChannelCursor, ChannelState};
pub use cursor::{LoopMode, PlaybackCursor};
pub use factory::{create_channel_states, ChannelRoster, MAX_ACTIVE_CHANNELS};
pub use note_tables::NoteTables;
pub use player::{Player, PlayerError, PlayerHandle, PlayerState};
pub use tempo::TempoEngine;
