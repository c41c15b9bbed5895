//! Sound-chip seam: the register contract the player drives, plus the
//! refresh-standard parameters everything times itself against.
//!
//! The actual synthesis engine lives behind [`SoundChip`]; the player only
//! writes registers and pulls finished sample buffers. [`NullChip`] is a
//! silence-producing implementation with frame-accurate sample counts.

use alloc::sync::Arc;

use crate::channel::Expansion;

/// Output sample rate the player renders at.
pub const SAMPLE_RATE: u32 = 44100;

/// Video refresh standard. Determines the logical frame rate, the tempo
/// tick rate, and the per-frame sample budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Ntsc,
    Pal,
}

impl Region {
    /// Logical frame rate in Hz.
    pub const fn frame_rate(self) -> f64 {
        match self {
            Region::Ntsc => 60.0988,
            Region::Pal => 50.0070,
        }
    }

    /// Integer tick rate used by the accumulator tempo model.
    pub const fn ticks_per_sec(self) -> i32 {
        match self {
            Region::Ntsc => 60,
            Region::Pal => 50,
        }
    }

    /// CPU clock in Hz, the reference for all period tables.
    pub const fn cpu_clock(self) -> f64 {
        match self {
            Region::Ntsc => 1_789_773.0,
            Region::Pal => 1_662_607.0,
        }
    }

    /// Samples in one rendered frame: `ceil(sample_rate / frame_rate)`.
    ///
    /// 734 for NTSC, 882 for PAL at 44100 Hz.
    pub fn samples_per_frame(self, sample_rate: u32) -> usize {
        libm::ceil(sample_rate as f64 / self.frame_rate()) as usize
    }
}

/// APU and expansion register addresses.
pub mod regs {
    // 2A03
    pub const PULSE1_VOL: u16 = 0x4000;
    pub const PULSE1_LO: u16 = 0x4002;
    pub const PULSE1_HI: u16 = 0x4003;
    pub const PULSE2_VOL: u16 = 0x4004;
    pub const PULSE2_LO: u16 = 0x4006;
    pub const PULSE2_HI: u16 = 0x4007;
    pub const TRI_LINEAR: u16 = 0x4008;
    pub const TRI_LO: u16 = 0x400A;
    pub const TRI_HI: u16 = 0x400B;
    pub const NOISE_VOL: u16 = 0x400C;
    pub const NOISE_PERIOD: u16 = 0x400E;
    pub const NOISE_LEN: u16 = 0x400F;
    pub const DMC_FREQ: u16 = 0x4010;
    pub const DMC_RAW: u16 = 0x4011;
    pub const DMC_START: u16 = 0x4012;
    pub const DMC_LEN: u16 = 0x4013;
    pub const SND_CHN: u16 = 0x4015;

    // VRC6
    pub const VRC6_PL1_VOL: u16 = 0x9000;
    pub const VRC6_PL1_LO: u16 = 0x9001;
    pub const VRC6_PL1_HI: u16 = 0x9002;
    pub const VRC6_PL2_VOL: u16 = 0xA000;
    pub const VRC6_PL2_LO: u16 = 0xA001;
    pub const VRC6_PL2_HI: u16 = 0xA002;
    pub const VRC6_SAW_VOL: u16 = 0xB000;
    pub const VRC6_SAW_LO: u16 = 0xB001;
    pub const VRC6_SAW_HI: u16 = 0xB002;

    // VRC7 (indexed access: select a register, then write its value)
    pub const VRC7_REG_SEL: u16 = 0x9010;
    pub const VRC7_REG_WRITE: u16 = 0x9030;

    // FDS
    pub const FDS_WAV_START: u16 = 0x4040;
    pub const FDS_VOL_ENV: u16 = 0x4080;
    pub const FDS_FREQ_LO: u16 = 0x4082;
    pub const FDS_FREQ_HI: u16 = 0x4083;
    pub const FDS_SWEEP_ENV: u16 = 0x4084;
    pub const FDS_SWEEP_BIAS: u16 = 0x4085;
    pub const FDS_MOD_LO: u16 = 0x4086;
    pub const FDS_MOD_HI: u16 = 0x4087;
    pub const FDS_VOL: u16 = 0x4089;
    pub const FDS_ENV_SPEED: u16 = 0x408A;

    // MMC5
    pub const MMC5_PL1_VOL: u16 = 0x5000;
    pub const MMC5_PL1_LO: u16 = 0x5002;
    pub const MMC5_PL1_HI: u16 = 0x5003;
    pub const MMC5_PL2_VOL: u16 = 0x5004;
    pub const MMC5_PL2_LO: u16 = 0x5006;
    pub const MMC5_PL2_HI: u16 = 0x5007;
    pub const MMC5_SND_CHN: u16 = 0x5015;

    // N163 (indexed access through the data/address ports)
    pub const N163_DATA: u16 = 0x4800;
    pub const N163_ADDR: u16 = 0xF800;

    // S5B (indexed access through the address/data ports)
    pub const S5B_ADDR: u16 = 0xC000;
    pub const S5B_DATA: u16 = 0xE000;
}

/// Host-owned DPCM sample memory the backend fetches from, one byte at a
/// time, while the DMC plays. Addresses are CPU addresses ($C000-$FFFF).
pub trait DmcSource: Send + Sync {
    fn read_sample_byte(&self, addr: u16) -> u8;
}

/// The register contract between the sequencer and the synthesis backend.
///
/// The player calls `reset` once per playback session, streams register
/// writes and channel enables every frame, then asks for the frame to be
/// finalized and read out. `begin_seek`/`end_seek` bracket the fast-forward
/// procedure so the backend can suppress audible output.
pub trait SoundChip: Send {
    /// Reinitialize for a playback session.
    fn reset(
        &mut self,
        sample_rate: u32,
        region: Region,
        expansion: Expansion,
        expansion_channels: u8,
        dmc: Arc<dyn DmcSource>,
    );

    /// Write a hardware register.
    fn write_register(&mut self, addr: u16, value: u8);

    /// Enable or disable one channel's output (mute mask), by roster index.
    fn set_channel_enabled(&mut self, channel: usize, enabled: bool);

    /// Enter seek mode: process register writes but produce no audio.
    fn begin_seek(&mut self);

    /// Leave seek mode.
    fn end_seek(&mut self);

    /// Finalize the current frame's synthesis.
    fn end_frame(&mut self);

    /// Samples ready to be read after `end_frame`.
    fn samples_available(&self) -> usize;

    /// Read finalized samples into `out`; returns the count actually read.
    fn read_samples(&mut self, out: &mut [i16]) -> usize;
}

/// A backend that accepts the full contract and synthesizes silence.
///
/// Sample counts are frame-accurate, so timing-sensitive callers (tests,
/// headless rendering) behave exactly as they would against a real chip.
#[derive(Default)]
pub struct NullChip {
    sample_rate: u32,
    region: Region,
    pending: usize,
    seeking: bool,
}

impl NullChip {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SoundChip for NullChip {
    fn reset(
        &mut self,
        sample_rate: u32,
        region: Region,
        _expansion: Expansion,
        _expansion_channels: u8,
        _dmc: Arc<dyn DmcSource>,
    ) {
        self.sample_rate = sample_rate;
        self.region = region;
        self.pending = 0;
        self.seeking = false;
    }

    fn write_register(&mut self, _addr: u16, _value: u8) {}

    fn set_channel_enabled(&mut self, _channel: usize, _enabled: bool) {}

    fn begin_seek(&mut self) {
        self.seeking = true;
    }

    fn end_seek(&mut self) {
        self.seeking = false;
    }

    fn end_frame(&mut self) {
        if !self.seeking {
            self.pending = self.region.samples_per_frame(self.sample_rate);
        }
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
