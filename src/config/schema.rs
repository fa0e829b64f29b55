//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::envelope::Mode;

/// Longest phase duration that still leaves wrap-safe headroom in the
/// 32-bit microsecond timebase.
pub const MAX_PHASE_MICROS: u32 = u32::MAX / 2;

/// Steepest curve rate whose exponential still fits in an `f64`
pub const MAX_RATE_SCALE: f64 = 709.0;

/// Main configuration for a Contour envelope module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContourConfig {
    /// Duration ranges for each timed slot
    #[serde(default)]
    pub timing: TimingConfig,

    /// Exponential curve parameters (AARR modes)
    #[serde(default)]
    pub curve: CurveConfig,

    /// Loop and sync policies
    #[serde(default)]
    pub looping: LoopConfig,

    /// End-of-release / end-of-fall trigger outputs
    #[serde(default)]
    pub triggers: TriggerConfig,

    /// LED display behaviour
    #[serde(default)]
    pub display: DisplayConfig,

    /// Analog input calibration
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Mode selected at power-up
    #[serde(default)]
    pub default_mode: Mode,

    /// Mirror the gate input on the gate output
    #[serde(default)]
    pub gate_passthrough: bool,
}

/// Reasons a configuration is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{slot} range is inverted: min {min} µs is above max {max} µs")]
    InvertedRange { slot: &'static str, min: u32, max: u32 },

    #[error("{slot} max of {max} µs exceeds the wrap-safe timing limit")]
    RangeTooLong { slot: &'static str, max: u32 },

    #[error("curve rate scale must be positive and finite, got {0}")]
    InvalidRateScale(f64),

    #[error("curve rate scale {0} is too steep, the limit is 709")]
    RateScaleTooLarge(f64),

    #[error("curve linear threshold must be non-negative and finite, got {0}")]
    InvalidThreshold(f64),

    #[error("trigger pulse width must be at least 1 µs")]
    ZeroPulseWidth,

    #[error("ADC zero offset {zero} must be below ADC max {max}")]
    InvalidCalibration { zero: u16, max: u16 },
}

impl ContourConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (slot, range) in self.timing.slots() {
            range.validate(slot)?;
        }

        if !(self.curve.rate_scale.is_finite() && self.curve.rate_scale > 0.0) {
            return Err(ConfigError::InvalidRateScale(self.curve.rate_scale));
        }
        if self.curve.rate_scale > MAX_RATE_SCALE {
            return Err(ConfigError::RateScaleTooLarge(self.curve.rate_scale));
        }
        if !(self.curve.linear_threshold.is_finite() && self.curve.linear_threshold >= 0.0) {
            return Err(ConfigError::InvalidThreshold(self.curve.linear_threshold));
        }

        if self.triggers.pulse_width_micros == 0 {
            return Err(ConfigError::ZeroPulseWidth);
        }

        if self.calibration.adc_zero >= self.calibration.adc_max {
            return Err(ConfigError::InvalidCalibration {
                zero: self.calibration.adc_zero,
                max: self.calibration.adc_max,
            });
        }

        Ok(())
    }
}

/// A `[min, max]` duration range in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    #[serde(default)]
    pub min_micros: u32,

    #[serde(default = "default_max_micros")]
    pub max_micros: u32,
}

fn default_max_micros() -> u32 { 5_000_000 }

impl Default for DurationRange {
    fn default() -> Self {
        Self {
            min_micros: 0,
            max_micros: default_max_micros(),
        }
    }
}

impl DurationRange {
    fn validate(&self, slot: &'static str) -> Result<(), ConfigError> {
        if self.min_micros > self.max_micros {
            return Err(ConfigError::InvertedRange {
                slot,
                min: self.min_micros,
                max: self.max_micros,
            });
        }
        if self.max_micros > MAX_PHASE_MICROS {
            return Err(ConfigError::RangeTooLong { slot, max: self.max_micros });
        }
        Ok(())
    }
}

/// Per-slot duration ranges
///
/// `sustain` is the hold time of the trapezoid loop; `delay` is the rest
/// between trapezoid cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default)]
    pub attack: DurationRange,
    #[serde(default)]
    pub decay: DurationRange,
    #[serde(default)]
    pub sustain: DurationRange,
    #[serde(default)]
    pub release: DurationRange,
    #[serde(default)]
    pub delay: DurationRange,
}

impl TimingConfig {
    pub fn slots(&self) -> [(&'static str, &DurationRange); 5] {
        [
            ("attack", &self.attack),
            ("decay", &self.decay),
            ("sustain", &self.sustain),
            ("release", &self.release),
            ("delay", &self.delay),
        ]
    }
}

/// Exponential curve settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Exponent applied at full sharpness (k = ±1)
    #[serde(default = "default_rate_scale")]
    pub rate_scale: f64,

    /// Sharpness magnitudes below this fall back to a linear ramp
    #[serde(default = "default_linear_threshold")]
    pub linear_threshold: f64,
}

fn default_rate_scale() -> f64 { 16.0 }
fn default_linear_threshold() -> f64 { 0.0001 }

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            rate_scale: default_rate_scale(),
            linear_threshold: default_linear_threshold(),
        }
    }
}

/// Loop and sync policies for the looping modes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Loop while the gate is released instead of while it is held
    #[serde(default = "default_true")]
    pub loop_when_gate_off: bool,

    /// A ping restarts the loop from zero instead of preserving continuity
    #[serde(default = "default_true")]
    pub hard_sync_on_ping: bool,
}

fn default_true() -> bool { true }

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            loop_when_gate_off: true,
            hard_sync_on_ping: true,
        }
    }
}

/// Trigger output settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Pulse when an attack begins (the previous cycle's release ended)
    #[serde(default)]
    pub end_of_release: bool,

    /// Pulse when a release begins
    #[serde(default)]
    pub end_of_fall: bool,

    /// Pulse width in microseconds (default: 10ms)
    #[serde(default = "default_pulse_width")]
    pub pulse_width_micros: u32,
}

fn default_pulse_width() -> u32 { 10_000 }

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            end_of_release: false,
            end_of_fall: false,
            pulse_width_micros: default_pulse_width(),
        }
    }
}

/// LED display settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// How long the mode stays on the LEDs after a mode change (default: 2s)
    #[serde(default = "default_show_mode")]
    pub show_mode_micros: u32,

    /// Drive a separate indicator while the mode is being shown
    #[serde(default)]
    pub mode_indicator: bool,
}

fn default_show_mode() -> u32 { 2_000_000 }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_mode_micros: default_show_mode(),
            mode_indicator: false,
        }
    }
}

/// Raw ADC calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Count corresponding to a full-scale reading
    #[serde(default = "default_adc_max")]
    pub adc_max: u16,

    /// Counts at or below this read as zero
    #[serde(default = "default_adc_zero")]
    pub adc_zero: u16,
}

fn default_adc_max() -> u16 { 1024 }
fn default_adc_zero() -> u16 { 15 }

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            adc_max: default_adc_max(),
            adc_zero: default_adc_zero(),
        }
    }
}
