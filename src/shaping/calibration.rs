//! Raw ADC calibration
//!
//! Maps raw analog counts to normalized CVs. Readings at or below the zero
//! offset read as 0 so a knob turned fully down sits cleanly at zero.

use crate::config::CalibrationConfig;

/// Linear ADC-count to [0, 1] mapping with a bottom deadband
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcCalibration {
    max: u16,
    zero: u16,
}

impl AdcCalibration {
    pub fn new(max: u16, zero: u16) -> Self {
        Self { max, zero }
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(config.adc_max, config.adc_zero)
    }

    /// Normalize a raw reading to [0, 1]
    pub fn normalize(&self, raw: u16) -> f64 {
        let span = self.max as f64 - self.zero as f64;
        if span <= f64::EPSILON {
            return 0.0;
        }
        ((raw as f64 - self.zero as f64) / span).clamp(0.0, 1.0)
    }
}

impl Default for AdcCalibration {
    fn default() -> Self {
        Self::from_config(&CalibrationConfig::default())
    }
}
