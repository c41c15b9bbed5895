//! Test doubles and fixtures shared by the unit tests.

use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::Mutex;

use fc_ir::{ChannelKind, DmcSource, Expansion, Note, Project, Region, Song, SoundChip};

use crate::channels::ChannelState;

/// A backend that records every call and produces silent frames with
/// region-accurate sample counts.
#[derive(Default)]
pub(crate) struct RecordingChip {
    pub writes: Vec<(u16, u8)>,
    pub enables: Vec<(usize, bool)>,
    pub frames: usize,
    pub resets: usize,
    pub seeking: bool,
    pub seek_spans: usize,
    pub sample_rate: u32,
    pub region: Region,
    pub expansion: Expansion,
    pending: usize,
}

impl RecordingChip {
    pub fn new() -> Self {
        Self::default()
    }

    /// All values written to one register, in order.
    pub fn writes_to(&self, addr: u16) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn last_write(&self, addr: u16) -> Option<u8> {
        self.writes_to(addr).last().copied()
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl SoundChip for RecordingChip {
    fn reset(
        &mut self,
        sample_rate: u32,
        region: Region,
        expansion: Expansion,
        _expansion_channels: u8,
        _dmc: Arc<dyn DmcSource>,
    ) {
        self.sample_rate = sample_rate;
        self.region = region;
        self.expansion = expansion;
        self.resets += 1;
        self.pending = 0;
    }

    fn write_register(&mut self, addr: u16, value: u8) {
        self.writes.push((addr, value));
    }

    fn set_channel_enabled(&mut self, channel: usize, enabled: bool) {
        self.enables.push((channel, enabled));
    }

    fn begin_seek(&mut self) {
        self.seeking = true;
    }

    fn end_seek(&mut self) {
        self.seeking = false;
        self.seek_spans += 1;
    }

    fn end_frame(&mut self) {
        self.frames += 1;
        self.pending = self.region.samples_per_frame(self.sample_rate);
    }

    fn samples_available(&self) -> usize {
        self.pending
    }

    fn read_samples(&mut self, out: &mut [i16]) -> usize {
        let n = self.pending.min(out.len());
        out[..n].fill(0);
        self.pending -= n;
        n
    }
}

/// A cloneable handle over a [`RecordingChip`], so a test can hand the
/// chip to a player and still inspect it afterwards.
#[derive(Clone)]
pub(crate) struct SharedChip(pub Arc<Mutex<RecordingChip>>);

impl SharedChip {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(RecordingChip::new())))
    }
}

impl SoundChip for SharedChip {
    fn reset(
        &mut self,
        sample_rate: u32,
        region: Region,
        expansion: Expansion,
        expansion_channels: u8,
        dmc: Arc<dyn DmcSource>,
    ) {
        self.0
            .lock()
            .unwrap()
            .reset(sample_rate, region, expansion, expansion_channels, dmc);
    }

    fn write_register(&mut self, addr: u16, value: u8) {
        self.0.lock().unwrap().write_register(addr, value);
    }

    fn set_channel_enabled(&mut self, channel: usize, enabled: bool) {
        self.0.lock().unwrap().set_channel_enabled(channel, enabled);
    }

    fn begin_seek(&mut self) {
        self.0.lock().unwrap().begin_seek();
    }

    fn end_seek(&mut self) {
        self.0.lock().unwrap().end_seek();
    }

    fn end_frame(&mut self) {
        self.0.lock().unwrap().end_frame();
    }

    fn samples_available(&self) -> usize {
        self.0.lock().unwrap().samples_available()
    }

    fn read_samples(&mut self, out: &mut [i16]) -> usize {
        self.0.lock().unwrap().read_samples(out)
    }
}

/// One-slot song with a single note at row 0 on a single track.
pub(crate) fn song_with_note(kind: ChannelKind, note: Note) -> Song {
    let mut song = Song::new("test", &[kind], 1, 8);
    *song
        .track_mut(0)
        .unwrap()
        .pattern_mut(0)
        .unwrap()
        .note_mut(0)
        .unwrap() = note;
    song
}

/// Run one full step + tick on a channel: advance, effects, envelopes,
/// register push.
pub(crate) fn play_note(
    channel: &mut dyn ChannelState,
    project: &Project,
    song: &Song,
    chip: &mut dyn SoundChip,
) {
    channel.advance(song, 0, 0);
    let mut speed = 6;
    channel.process_effects(song, 0, 0, &mut speed);
    channel.update_envelopes(project);
    channel.update_registers(project, chip);
}
