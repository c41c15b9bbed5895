//! Core IR types for the famicore NES music player.
//!
//! This crate defines the project/song representation consumed by the
//! playback engine, plus the seam to the sound-synthesis backend: the
//! `SoundChip` register contract, APU register addresses, and the DPCM
//! sample-fetch callback.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod apu;
mod channel;
mod dpcm;
mod instrument;
mod pattern;
mod project;
pub mod song;

pub use apu::{DmcSource, NullChip, Region, SoundChip, SAMPLE_RATE};
pub use channel::{ChannelKind, Expansion};
pub use dpcm::{DpcmSample, SampleMemory, DPCM_BASE_ADDR};
pub use instrument::{Envelope, EnvelopeKind, Instrument, Vrc7Patch};
pub use pattern::{Effect, Note, NoteValue, Pattern, NOTE_MAX, NOTE_MIN};
pub use project::{Project, TempoMode};
pub use song::{Song, Track};
