//! Operating modes and phases

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transition topology selected with the mode button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Attack, decay to a sustain level, release on gate off
    #[default]
    Adsr,
    /// Curved attack to full level, hold while gated, curved release
    Aarr,
    /// Free-running curved attack/release loop
    AarrLoop,
    /// Trapezoid: attack, hold, release, then a delay before the next cycle
    TrapLoop,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Adsr, Mode::Aarr, Mode::AarrLoop, Mode::TrapLoop];

    /// The mode after this one, wrapping around
    pub fn next(self) -> Mode {
        Mode::ALL[(self.index() + 1) % Mode::ALL.len()]
    }

    /// Position in [`Mode::ALL`], also the LED shown for this mode
    pub fn index(self) -> usize {
        match self {
            Mode::Adsr => 0,
            Mode::Aarr => 1,
            Mode::AarrLoop => 2,
            Mode::TrapLoop => 3,
        }
    }

    /// Whether the mode cycles on its own
    pub fn is_looping(self) -> bool {
        matches!(self, Mode::AarrLoop | Mode::TrapLoop)
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Adsr => "adsr",
            Mode::Aarr => "aarr",
            Mode::AarrLoop => "aarr_loop",
            Mode::TrapLoop => "trap_loop",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Envelope stage
///
/// Ordered: skipping a zero-length phase moves to the next one in this
/// order, and `Off` wraps around to `Attack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Attack,
    Decay,
    Sustain,
    Release,
    #[default]
    Off,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Attack,
        Phase::Decay,
        Phase::Sustain,
        Phase::Release,
        Phase::Off,
    ];

    pub const COUNT: usize = Phase::ALL.len();

    /// The phase after this one, wrapping around
    pub fn next(self) -> Phase {
        Phase::ALL[(self.index() + 1) % Phase::COUNT]
    }

    pub fn index(self) -> usize {
        match self {
            Phase::Attack => 0,
            Phase::Decay => 1,
            Phase::Sustain => 2,
            Phase::Release => 3,
            Phase::Off => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Attack => "attack",
            Phase::Decay => "decay",
            Phase::Sustain => "sustain",
            Phase::Release => "release",
            Phase::Off => "off",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of CV inputs (knobs / jacks)
pub const CV_CHANNELS: usize = 4;

/// The last sampled value of each CV input, normalized to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CvValues([f64; CV_CHANNELS]);

impl CvValues {
    pub fn new(values: [f64; CV_CHANNELS]) -> Self {
        let mut cv = Self([0.0; CV_CHANNELS]);
        for (channel, value) in values.into_iter().enumerate() {
            cv.set(channel, value);
        }
        cv
    }

    /// Value of `channel`; out-of-range channels read as 0
    pub fn get(&self, channel: usize) -> f64 {
        self.0.get(channel).copied().unwrap_or(0.0)
    }

    /// Store a reading, clamped to [0, 1]; NaN reads as 0
    pub fn set(&mut self, channel: usize, value: f64) {
        if let Some(slot) = self.0.get_mut(channel) {
            *slot = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        }
    }

    pub fn as_array(&self) -> [f64; CV_CHANNELS] {
        self.0
    }
}

impl Default for CvValues {
    /// Power-on knob positions assumed before the first reading
    fn default() -> Self {
        Self([0.2, 0.2, 0.8, 0.2])
    }
}
