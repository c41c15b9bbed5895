//! Channel kinds and expansion-audio families.

/// An optional expansion sound chip beyond the base 2A03 channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Expansion {
    #[default]
    None,
    Vrc6,
    Vrc7,
    Fds,
    Mmc5,
    N163,
    S5b,
}

impl Expansion {
    /// Number of channels this expansion contributes.
    ///
    /// N163 is configurable (1-8); this returns the family maximum.
    pub const fn max_channels(self) -> u8 {
        match self {
            Expansion::None => 0,
            Expansion::Vrc6 => 3,
            Expansion::Vrc7 => 6,
            Expansion::Fds => 1,
            Expansion::Mmc5 => 2,
            Expansion::N163 => 8,
            Expansion::S5b => 3,
        }
    }
}

/// Every channel kind the player can drive.
///
/// The first five are the base 2A03 channels and are always active; the
/// rest belong to an expansion family and are active only when the project
/// enables that family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChannelKind {
    Square1,
    Square2,
    Triangle,
    Noise,
    Dpcm,
    Vrc6Square1,
    Vrc6Square2,
    Vrc6Saw,
    Vrc7Fm1,
    Vrc7Fm2,
    Vrc7Fm3,
    Vrc7Fm4,
    Vrc7Fm5,
    Vrc7Fm6,
    FdsWave,
    Mmc5Square1,
    Mmc5Square2,
    N163Wave1,
    N163Wave2,
    N163Wave3,
    N163Wave4,
    N163Wave5,
    N163Wave6,
    N163Wave7,
    N163Wave8,
    S5BSquare1,
    S5BSquare2,
    S5BSquare3,
}

impl ChannelKind {
    /// Total number of channel kinds.
    pub const COUNT: usize = 28;

    /// All channel kinds, in canonical roster order.
    pub const ALL: [ChannelKind; Self::COUNT] = [
        ChannelKind::Square1,
        ChannelKind::Square2,
        ChannelKind::Triangle,
        ChannelKind::Noise,
        ChannelKind::Dpcm,
        ChannelKind::Vrc6Square1,
        ChannelKind::Vrc6Square2,
        ChannelKind::Vrc6Saw,
        ChannelKind::Vrc7Fm1,
        ChannelKind::Vrc7Fm2,
        ChannelKind::Vrc7Fm3,
        ChannelKind::Vrc7Fm4,
        ChannelKind::Vrc7Fm5,
        ChannelKind::Vrc7Fm6,
        ChannelKind::FdsWave,
        ChannelKind::Mmc5Square1,
        ChannelKind::Mmc5Square2,
        ChannelKind::N163Wave1,
        ChannelKind::N163Wave2,
        ChannelKind::N163Wave3,
        ChannelKind::N163Wave4,
        ChannelKind::N163Wave5,
        ChannelKind::N163Wave6,
        ChannelKind::N163Wave7,
        ChannelKind::N163Wave8,
        ChannelKind::S5BSquare1,
        ChannelKind::S5BSquare2,
        ChannelKind::S5BSquare3,
    ];

    /// The expansion family this kind belongs to (`Expansion::None` for the
    /// base 2A03 channels).
    pub const fn expansion(self) -> Expansion {
        match self {
            ChannelKind::Square1
            | ChannelKind::Square2
            | ChannelKind::Triangle
            | ChannelKind::Noise
            | ChannelKind::Dpcm => Expansion::None,
            ChannelKind::Vrc6Square1 | ChannelKind::Vrc6Square2 | ChannelKind::Vrc6Saw => {
                Expansion::Vrc6
            }
            ChannelKind::Vrc7Fm1
            | ChannelKind::Vrc7Fm2
            | ChannelKind::Vrc7Fm3
            | ChannelKind::Vrc7Fm4
            | ChannelKind::Vrc7Fm5
            | ChannelKind::Vrc7Fm6 => Expansion::Vrc7,
            ChannelKind::FdsWave => Expansion::Fds,
            ChannelKind::Mmc5Square1 | ChannelKind::Mmc5Square2 => Expansion::Mmc5,
            ChannelKind::N163Wave1
            | ChannelKind::N163Wave2
            | ChannelKind::N163Wave3
            | ChannelKind::N163Wave4
            | ChannelKind::N163Wave5
            | ChannelKind::N163Wave6
            | ChannelKind::N163Wave7
            | ChannelKind::N163Wave8 => Expansion::N163,
            ChannelKind::S5BSquare1 | ChannelKind::S5BSquare2 | ChannelKind::S5BSquare3 => {
                Expansion::S5b
            }
        }
    }

    /// Index of this channel within its expansion family (0-based).
    ///
    /// Base channels index within the 2A03 family.
    pub const fn expansion_channel_index(self) -> u8 {
        match self {
            ChannelKind::Square1 => 0,
            ChannelKind::Square2 => 1,
            ChannelKind::Triangle => 2,
            ChannelKind::Noise => 3,
            ChannelKind::Dpcm => 4,
            ChannelKind::Vrc6Square1 => 0,
            ChannelKind::Vrc6Square2 => 1,
            ChannelKind::Vrc6Saw => 2,
            ChannelKind::Vrc7Fm1 => 0,
            ChannelKind::Vrc7Fm2 => 1,
            ChannelKind::Vrc7Fm3 => 2,
            ChannelKind::Vrc7Fm4 => 3,
            ChannelKind::Vrc7Fm5 => 4,
            ChannelKind::Vrc7Fm6 => 5,
            ChannelKind::FdsWave => 0,
            ChannelKind::Mmc5Square1 => 0,
            ChannelKind::Mmc5Square2 => 1,
            ChannelKind::N163Wave1 => 0,
            ChannelKind::N163Wave2 => 1,
            ChannelKind::N163Wave3 => 2,
            ChannelKind::N163Wave4 => 3,
            ChannelKind::N163Wave5 => 4,
            ChannelKind::N163Wave6 => 5,
            ChannelKind::N163Wave7 => 6,
            ChannelKind::N163Wave8 => 7,
            ChannelKind::S5BSquare1 => 0,
            ChannelKind::S5BSquare2 => 1,
            ChannelKind::S5BSquare3 => 2,
        }
    }

    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            ChannelKind::Square1 => "Square 1",
            ChannelKind::Square2 => "Square 2",
            ChannelKind::Triangle => "Triangle",
            ChannelKind::Noise => "Noise",
            ChannelKind::Dpcm => "DPCM",
            ChannelKind::Vrc6Square1 => "VRC6 Square 1",
            ChannelKind::Vrc6Square2 => "VRC6 Square 2",
            ChannelKind::Vrc6Saw => "VRC6 Saw",
            ChannelKind::Vrc7Fm1 => "VRC7 FM 1",
            ChannelKind::Vrc7Fm2 => "VRC7 FM 2",
            ChannelKind::Vrc7Fm3 => "VRC7 FM 3",
            ChannelKind::Vrc7Fm4 => "VRC7 FM 4",
            ChannelKind::Vrc7Fm5 => "VRC7 FM 5",
            ChannelKind::Vrc7Fm6 => "VRC7 FM 6",
            ChannelKind::FdsWave => "FDS",
            ChannelKind::Mmc5Square1 => "MMC5 Square 1",
            ChannelKind::Mmc5Square2 => "MMC5 Square 2",
            ChannelKind::N163Wave1 => "N163 Wave 1",
            ChannelKind::N163Wave2 => "N163 Wave 2",
            ChannelKind::N163Wave3 => "N163 Wave 3",
            ChannelKind::N163Wave4 => "N163 Wave 4",
            ChannelKind::N163Wave5 => "N163 Wave 5",
            ChannelKind::N163Wave6 => "N163 Wave 6",
            ChannelKind::N163Wave7 => "N163 Wave 7",
            ChannelKind::N163Wave8 => "N163 Wave 8",
            ChannelKind::S5BSquare1 => "S5B Square 1",
            ChannelKind::S5BSquare2 => "S5B Square 2",
            ChannelKind::S5BSquare3 => "S5B Square 3",
        }
    }
}
