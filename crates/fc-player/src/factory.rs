//! Channel-state construction.
//!
//! Maps the project's active channel kinds to concrete state machines,
//! once per playback session.

use alloc::boxed::Box;
use alloc::sync::Arc;

use fc_ir::{apu::regs, ChannelKind, Project, Region};

use crate::channels::dpcm::DpcmChannel;
use crate::channels::fds::FdsChannel;
use crate::channels::n163::N163Channel;
use crate::channels::noise::NoiseChannel;
use crate::channels::s5b::S5bChannel;
use crate::channels::square::SquareChannel;
use crate::channels::triangle::TriangleChannel;
use crate::channels::vrc6::{Vrc6SawChannel, Vrc6SquareChannel};
use crate::channels::vrc7::Vrc7Channel;
use crate::channels::ChannelState;
use crate::note_tables::NoteTables;

/// Upper bound on roster size (base five plus the largest expansion).
pub const MAX_ACTIVE_CHANNELS: usize = 16;

/// A playback session's channel roster.
pub type ChannelRoster = heapless::Vec<Box<dyn ChannelState>, MAX_ACTIVE_CHANNELS>;

/// Build the roster for a project: one state per active channel kind, in
/// canonical order, each bound to its track index.
pub fn create_channel_states(project: &Project, region: Region) -> ChannelRoster {
    let tables = Arc::new(NoteTables::new(region));
    let mut roster = ChannelRoster::new();

    let mut track = 0;
    for kind in ChannelKind::ALL {
        if !project.is_channel_active(kind) {
            continue;
        }
        let state = create_channel_state(kind, track, project, region, &tables);
        if roster.push(state).is_err() {
            panic!("channel roster exceeds {} entries", MAX_ACTIVE_CHANNELS);
        }
        track += 1;
    }

    debug_assert_eq!(roster.len(), project.active_channel_count());
    roster
}

/// Construct one channel state. A kind whose expansion family is not
/// enabled on the project is a configuration mismatch and fails fast.
pub fn create_channel_state(
    kind: ChannelKind,
    track: usize,
    project: &Project,
    region: Region,
    tables: &Arc<NoteTables>,
) -> Box<dyn ChannelState> {
    assert!(
        project.is_channel_active(kind),
        "channel kind {} is not active under this project configuration",
        kind.name()
    );

    let tables = tables.clone();
    let family_index = kind.expansion_channel_index();

    match kind {
        ChannelKind::Square1 => Box::new(SquareChannel::new(
            kind,
            track,
            region,
            tables,
            regs::PULSE1_VOL,
        )),
        ChannelKind::Square2 => Box::new(SquareChannel::new(
            kind,
            track,
            region,
            tables,
            regs::PULSE2_VOL,
        )),
        ChannelKind::Triangle => Box::new(TriangleChannel::new(kind, track, region, tables)),
        ChannelKind::Noise => Box::new(NoiseChannel::new(kind, track, region, tables)),
        ChannelKind::Dpcm => Box::new(DpcmChannel::new(kind, track, region, tables)),
        ChannelKind::Vrc6Square1 => Box::new(Vrc6SquareChannel::new(
            kind,
            track,
            region,
            tables,
            regs::VRC6_PL1_VOL,
        )),
        ChannelKind::Vrc6Square2 => Box::new(Vrc6SquareChannel::new(
            kind,
            track,
            region,
            tables,
            regs::VRC6_PL2_VOL,
        )),
        ChannelKind::Vrc6Saw => Box::new(Vrc6SawChannel::new(kind, track, region, tables)),
        ChannelKind::Vrc7Fm1
        | ChannelKind::Vrc7Fm2
        | ChannelKind::Vrc7Fm3
        | ChannelKind::Vrc7Fm4
        | ChannelKind::Vrc7Fm5
        | ChannelKind::Vrc7Fm6 => Box::new(Vrc7Channel::new(
            kind,
            track,
            region,
            tables,
            family_index,
        )),
        ChannelKind::FdsWave => Box::new(FdsChannel::new(kind, track, region, tables)),
        ChannelKind::Mmc5Square1 => Box::new(SquareChannel::new(
            kind,
            track,
            region,
            tables,
            regs::MMC5_PL1_VOL,
        )),
        ChannelKind::Mmc5Square2 => Box::new(SquareChannel::new(
            kind,
            track,
            region,
            tables,
            regs::MMC5_PL2_VOL,
        )),
        ChannelKind::N163Wave1
        | ChannelKind::N163Wave2
        | ChannelKind::N163Wave3
        | ChannelKind::N163Wave4
        | ChannelKind::N163Wave5
        | ChannelKind::N163Wave6
        | ChannelKind::N163Wave7
        | ChannelKind::N163Wave8 => Box::new(N163Channel::new(
            kind,
            track,
            region,
            tables,
            family_index,
            project.expansion_channel_count(),
        )),
        ChannelKind::S5BSquare1 | ChannelKind::S5BSquare2 | ChannelKind::S5BSquare3 => {
            Box::new(S5bChannel::new(kind, track, region, tables, family_index))
        }
    }
}
