//! Integration test: build a project → begin playback → render frames
//! against the null backend → verify timing, looping, and seeking.

use std::sync::Arc;

use fc_ir::{
    ChannelKind, Expansion, Instrument, Note, NullChip, Project, Region, Song, TempoMode,
};
use fc_player::{LoopMode, Player, PlayerError, PlayerState};

const BASE: [ChannelKind; 5] = [
    ChannelKind::Square1,
    ChannelKind::Square2,
    ChannelKind::Triangle,
    ChannelKind::Noise,
    ChannelKind::Dpcm,
];

fn base_project(tempo_mode: TempoMode, length: usize, pattern_length: u16) -> Project {
    let mut project = Project::new("integration");
    project.tempo_mode = tempo_mode;
    project.instruments.push(Instrument::new("flat"));
    project
        .songs
        .push(Song::new("song", &BASE, length, pattern_length));
    project
}

fn new_player() -> Player {
    Player::new(Box::new(NullChip::new()))
}

/// Render until the player reports the end, with a safety cap.
fn render_to_end(player: &mut Player, cap: usize) -> usize {
    let mut frames = 0;
    while frames < cap {
        let Some(samples) = player.play_frame() else {
            break;
        };
        assert!(!samples.is_empty());
        frames += 1;
    }
    frames
}

// --- Frame accounting ---

#[test]
fn accumulator_song_renders_speed_frames_per_note() {
    // 8 notes at speed 6 = 48 frames, then the end is reported.
    let project = base_project(TempoMode::FamiTracker, 2, 4);
    let mut player = new_player();
    player.set_loop_mode(LoopMode::None);
    player
        .begin_play_song(Arc::new(project), 0, Region::Ntsc, 0)
        .unwrap();

    assert_eq!(render_to_end(&mut player, 1000), 48);
    assert_eq!(player.state(), PlayerState::Stopped);
}

#[test]
fn native_song_renders_one_note_per_frame_on_ntsc() {
    let project = base_project(TempoMode::Native, 2, 4);
    let mut player = new_player();
    player.set_loop_mode(LoopMode::None);
    player
        .begin_play_song(Arc::new(project), 0, Region::Ntsc, 0)
        .unwrap();

    assert_eq!(render_to_end(&mut player, 1000), 8);
}

#[test]
fn ntsc_and_pal_frames_have_hardware_sample_counts() {
    for (region, expected) in [(Region::Ntsc, 734), (Region::Pal, 882)] {
        let project = base_project(TempoMode::FamiTracker, 1, 4);
        let mut player = new_player();
        player
            .begin_play_song(Arc::new(project), 0, region, 0)
            .unwrap();
        let samples = player.play_frame().unwrap();
        assert_eq!(samples.len(), expected);
    }
}

#[test]
fn native_pal_dilation_advances_13_ticks_per_11_frames() {
    let project = base_project(TempoMode::Native, 4, 8);
    let mut player = new_player();
    player
        .begin_play_song(Arc::new(project), 0, Region::Pal, 0)
        .unwrap();

    for _ in 0..11 {
        player.play_frame().unwrap();
    }
    // 13 ticks, minus the first-frame step that does not advance.
    assert_eq!(player.position(), 12);
}

// --- Looping ---

#[test]
fn looping_song_keeps_rendering() {
    let project = base_project(TempoMode::Native, 2, 2);
    let mut player = new_player();
    player
        .begin_play_song(Arc::new(project), 0, Region::Ntsc, 0)
        .unwrap();

    for _ in 0..1000 {
        assert!(player.play_frame().is_some());
    }
    assert!(player.position() < 4);
}

#[test]
fn loop_point_bounds_the_steady_state() {
    let mut project = base_project(TempoMode::Native, 3, 4);
    project.songs[0].loop_point = Some(2);
    let mut player = new_player();
    player
        .begin_play_song(Arc::new(project), 0, Region::Ntsc, 0)
        .unwrap();

    for _ in 0..100 {
        player.play_frame().unwrap();
    }
    // Steady state cycles within pattern 2 (notes 8-11).
    for _ in 0..20 {
        player.play_frame().unwrap();
        let pos = player.position();
        assert!((8..12).contains(&pos), "position {pos} escaped the loop");
    }
}

// --- Seeking ---

#[test]
fn seek_agrees_with_played_through_position_in_both_tempo_modes() {
    for tempo_mode in [TempoMode::FamiTracker, TempoMode::Native] {
        let mut project = base_project(tempo_mode, 4, 4);
        *project.songs[0]
            .track_mut(0)
            .unwrap()
            .pattern_mut(1)
            .unwrap()
            .note_mut(0)
            .unwrap() = Note::musical(49, 0);
        let project = Arc::new(project);

        let mut seeker = new_player();
        seeker
            .begin_play_song(project.clone(), 0, Region::Ntsc, 10)
            .unwrap();
        seeker.play_frame().unwrap();

        let mut stepper = new_player();
        stepper
            .begin_play_song(project.clone(), 0, Region::Ntsc, 0)
            .unwrap();
        while stepper.position() < 10 {
            stepper.play_frame().unwrap();
        }

        assert_eq!(seeker.position(), stepper.position(), "{:?}", tempo_mode);
    }
}

#[test]
fn seek_to_an_unreachable_note_reports_failure() {
    let project = base_project(TempoMode::FamiTracker, 2, 4);
    let mut player = new_player();
    player.set_loop_mode(LoopMode::None);

    let err = player
        .begin_play_song(Arc::new(project), 0, Region::Ntsc, 500)
        .unwrap_err();
    assert_eq!(err, PlayerError::SeekTarget { target: 500 });
    assert_eq!(player.state(), PlayerState::Idle);
}

// --- Expansion rosters ---

#[test]
fn every_expansion_project_plays_end_to_end() {
    let cases = [
        (Expansion::None, 0, 5usize),
        (Expansion::Vrc6, 0, 8),
        (Expansion::Vrc7, 0, 11),
        (Expansion::Fds, 0, 6),
        (Expansion::Mmc5, 0, 7),
        (Expansion::N163, 4, 9),
        (Expansion::S5b, 0, 8),
    ];

    for (expansion, channels, active) in cases {
        let mut project = Project::with_expansion("expansion", expansion, channels);
        project.tempo_mode = TempoMode::Native;
        project.instruments.push(Instrument::new("flat"));
        let kinds: Vec<ChannelKind> = project.active_channels().collect();
        assert_eq!(kinds.len(), active, "{:?}", expansion);
        project.songs.push(Song::new("song", &kinds, 2, 4));

        let mut player = new_player();
        player.set_loop_mode(LoopMode::None);
        player
            .begin_play_song(Arc::new(project), 0, Region::Ntsc, 0)
            .unwrap();
        assert_eq!(render_to_end(&mut player, 100), 8, "{:?}", expansion);
    }
}

// --- Session lifecycle ---

#[test]
fn rebinding_a_song_restarts_playback() {
    let project = Arc::new(base_project(TempoMode::Native, 2, 4));
    let mut player = new_player();

    player
        .begin_play_song(project.clone(), 0, Region::Ntsc, 0)
        .unwrap();
    for _ in 0..5 {
        player.play_frame().unwrap();
    }
    assert_eq!(player.position(), 4);

    player
        .begin_play_song(project, 0, Region::Ntsc, 0)
        .unwrap();
    player.play_frame().unwrap();
    assert_eq!(player.position(), 0);
}

#[test]
fn control_handle_outlives_sessions() {
    let project = Arc::new(base_project(TempoMode::Native, 2, 4));
    let mut player = new_player();
    let handle = player.handle();

    player
        .begin_play_song(project, 0, Region::Ntsc, 0)
        .unwrap();
    handle.set_channel_mask(0b11);
    assert_eq!(player.channel_mask(), 0b11);

    for _ in 0..3 {
        player.play_frame().unwrap();
    }
    assert_eq!(handle.position(), 2);

    player.shutdown();
    assert_eq!(handle.channel_mask(), 0b11);
}
