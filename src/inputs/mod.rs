//! CV inputs
//!
//! The envelope reads its knobs through [`CvSource`] and only on the phase
//! entries that need them. Hardware adapters implement [`AdcReader`] and get
//! calibration for free through [`AdcCv`]; simulations and tests use
//! [`FixedCv`].

use crate::config::CalibrationConfig;
use crate::envelope::CV_CHANNELS;
use crate::shaping::AdcCalibration;

/// Source of normalized control voltages
pub trait CvSource {
    /// Read `channel` (0..4), normalized to [0, 1]
    fn read_cv(&mut self, channel: usize) -> f64;
}

impl<S: CvSource + ?Sized> CvSource for &mut S {
    fn read_cv(&mut self, channel: usize) -> f64 {
        (**self).read_cv(channel)
    }
}

/// Knob positions held in memory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCv {
    values: [f64; CV_CHANNELS],
}

impl FixedCv {
    pub fn new(values: [f64; CV_CHANNELS]) -> Self {
        let mut cv = Self { values: [0.0; CV_CHANNELS] };
        for (channel, value) in values.into_iter().enumerate() {
            cv.set(channel, value);
        }
        cv
    }

    /// Turn knob `channel` to `value` (clamped to [0, 1])
    pub fn set(&mut self, channel: usize, value: f64) {
        if let Some(slot) = self.values.get_mut(channel) {
            *slot = value.clamp(0.0, 1.0);
        }
    }

    pub fn values(&self) -> [f64; CV_CHANNELS] {
        self.values
    }
}

impl Default for FixedCv {
    fn default() -> Self {
        Self::new([0.5; CV_CHANNELS])
    }
}

impl CvSource for FixedCv {
    fn read_cv(&mut self, channel: usize) -> f64 {
        self.values.get(channel).copied().unwrap_or(0.0)
    }
}

/// Raw analog-to-digital converter access
pub trait AdcReader {
    /// Raw count for `channel`
    fn read_raw(&mut self, channel: usize) -> u16;
}

impl<F: FnMut(usize) -> u16> AdcReader for F {
    fn read_raw(&mut self, channel: usize) -> u16 {
        self(channel)
    }
}

/// CV source backed by an ADC with zero-offset calibration
pub struct AdcCv<R> {
    reader: R,
    calibration: AdcCalibration,
}

impl<R: AdcReader> AdcCv<R> {
    pub fn new(reader: R, calibration: AdcCalibration) -> Self {
        Self { reader, calibration }
    }

    pub fn from_config(reader: R, config: &CalibrationConfig) -> Self {
        Self::new(reader, AdcCalibration::from_config(config))
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

impl<R: AdcReader> CvSource for AdcCv<R> {
    fn read_cv(&mut self, channel: usize) -> f64 {
        self.calibration.normalize(self.reader.read_raw(channel))
    }
}
