//! End-of-phase trigger outputs
//!
//! Fixed-width pulses raised when a phase is entered and dropped by the
//! tick once the pulse width has elapsed.

use super::Micros;
use crate::config::TriggerConfig;

/// A one-shot pulse output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseOutput {
    enabled: bool,
    width: Micros,
    raised_at: Micros,
    high: bool,
}

impl PulseOutput {
    pub fn new(enabled: bool, width: Micros) -> Self {
        Self {
            enabled,
            width: width.max(1),
            raised_at: 0,
            high: false,
        }
    }

    /// Raise the output; restarts the pulse if it is already high
    pub fn fire(&mut self, now: Micros) {
        if self.enabled {
            self.raised_at = now;
            self.high = true;
        }
    }

    /// Drop the output once the pulse width has elapsed
    pub fn update(&mut self, now: Micros) {
        if self.high && now.wrapping_sub(self.raised_at) >= self.width {
            self.high = false;
        }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// The module's two trigger outputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerOutputs {
    /// Fires on entering attack, i.e. when the previous release has ended
    pub end_of_release: PulseOutput,
    /// Fires on entering release, i.e. when the rise and hold are over
    pub end_of_fall: PulseOutput,
}

impl TriggerOutputs {
    pub fn from_config(config: &TriggerConfig) -> Self {
        Self {
            end_of_release: PulseOutput::new(config.end_of_release, config.pulse_width_micros),
            end_of_fall: PulseOutput::new(config.end_of_fall, config.pulse_width_micros),
        }
    }

    pub fn update(&mut self, now: Micros) {
        self.end_of_release.update(now);
        self.end_of_fall.update(now);
    }
}
