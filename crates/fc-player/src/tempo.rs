//! Tick and step timing for the two tempo models.
//!
//! The accumulator model runs one tick per rendered frame and gates
//! musical steps with fractional speed/tempo arithmetic. The native model
//! steps on every tick and instead varies how many ticks a frame spans,
//! compensating for PAL's slower refresh against the fixed sample budget.

use fc_ir::{Region, TempoMode};

/// Converts tempo configuration into ticks-per-frame and step gating.
///
/// The counter is signed on purpose: a step fires exactly when it lands at
/// or below zero, and the replenish arithmetic relies on the overshoot.
pub struct TempoEngine {
    mode: TempoMode,
    region: Region,
    counter: i32,
    frame_pattern: u32,
}

impl TempoEngine {
    pub fn new(mode: TempoMode, region: Region) -> Self {
        Self {
            mode,
            region,
            counter: 0,
            frame_pattern: 0,
        }
    }

    pub fn mode(&self) -> TempoMode {
        self.mode
    }

    /// Reset to the start-of-playback baseline.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.frame_pattern = 0;
    }

    /// How many logical ticks the next rendered frame spans.
    ///
    /// Accumulator mode: always 1. Native mode: a 12-entry cycle of the
    /// frame bit pattern; under PAL a frame spans 2 ticks whenever the
    /// shifted-out bit is set.
    pub fn ticks_for_frame(&mut self) -> u32 {
        match self.mode {
            TempoMode::FamiTracker => 1,
            TempoMode::Native => {
                if self.counter <= 0 {
                    self.counter = 11;
                    self.frame_pattern = 0x104 << 1;
                }
                self.counter -= 1;
                self.frame_pattern >>= 1;

                if self.region == Region::Pal && self.frame_pattern & 1 != 0 {
                    2
                } else {
                    1
                }
            }
        }
    }

    /// Whether a musical step elapses on this tick. Must be evaluated every
    /// tick in accumulator mode, step or not; native mode steps always.
    pub fn update(&mut self, speed: u8, tempo: u8) -> bool {
        match self.mode {
            TempoMode::FamiTracker => {
                let speed = i32::from(speed.max(1));
                let scaled = i32::from(tempo) * 24;
                let decrement = scaled / speed;
                let remainder = scaled % speed;

                if self.counter <= 0 {
                    self.counter += 60 * self.region.ticks_per_sec() - remainder;
                }
                self.counter -= decrement;

                self.counter <= 0
            }
            TempoMode::Native => true,
        }
    }
}
