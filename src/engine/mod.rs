//! Control loop for one envelope channel
//!
//! Polls the digital inputs, turns their edges into envelope events, ticks
//! the envelope and collects everything the hardware drives.

mod latch;
mod recorder;

pub use latch::PendingEvents;
pub use recorder::Recorder;

use serde::Serialize;

use crate::config::ContourConfig;
use crate::envelope::{Envelope, LedPattern, Micros};
use crate::inputs::CvSource;

/// Full-scale code of the 12-bit output DAC
pub const DAC_MAX: u16 = 4095;

/// Levels of the digital inputs at one poll
///
/// `mode_button` is expected to be debounced already.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigitalInputs {
    pub gate: bool,
    pub ping: bool,
    pub mode_button: bool,
}

/// Everything driven by one poll
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outputs {
    /// Envelope level in [0, 1]
    pub value: f64,
    pub dac_code: u16,
    pub leds: LedPattern,
    pub mode_indicator: bool,
    pub end_of_release: bool,
    pub end_of_fall: bool,
    pub gate_out: bool,
}

/// Scale an envelope level to a DAC code
pub fn dac_code(value: f64) -> u16 {
    (value.clamp(0.0, 1.0) * DAC_MAX as f64).round() as u16
}

/// The main control loop
pub struct Engine<C> {
    envelope: Envelope<C>,
    gate_passthrough: bool,
    last: DigitalInputs,
}

impl<C: CvSource> Engine<C> {
    /// Create an engine with the given configuration
    pub fn new(config: &ContourConfig, cv_source: C) -> Self {
        Self::starting_at(config, cv_source, 0)
    }

    /// Create an engine whose timer starts at `now`
    pub fn starting_at(config: &ContourConfig, cv_source: C, now: Micros) -> Self {
        Self {
            envelope: Envelope::starting_at(config, cv_source, now),
            gate_passthrough: config.gate_passthrough,
            last: DigitalInputs::default(),
        }
    }

    /// Run one iteration of the control loop
    ///
    /// Events are applied in the order mode button, gate, ping, then the
    /// envelope is ticked to `now`.
    pub fn poll(&mut self, now: Micros, inputs: DigitalInputs) -> Outputs {
        if inputs.mode_button && !self.last.mode_button {
            self.envelope.cycle_mode();
        }
        if inputs.gate != self.last.gate {
            self.envelope.set_gate(inputs.gate);
        }
        if inputs.ping && !self.last.ping {
            self.envelope.ping();
        }
        self.last = inputs;

        let value = self.envelope.tick(now);
        Outputs {
            value,
            dac_code: dac_code(value),
            leds: self.envelope.led_pattern(),
            mode_indicator: self.envelope.mode_indicator(),
            end_of_release: self.envelope.end_of_release(),
            end_of_fall: self.envelope.end_of_fall(),
            gate_out: self.gate_passthrough && inputs.gate,
        }
    }

    pub fn envelope(&self) -> &Envelope<C> {
        &self.envelope
    }

    pub fn envelope_mut(&mut self) -> &mut Envelope<C> {
        &mut self.envelope
    }
}
