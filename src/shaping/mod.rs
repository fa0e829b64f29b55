//! Numeric shaping for envelope segments and inputs
//!
//! Exponential segment curves, CV-to-duration interpolation and ADC
//! calibration.

mod calibration;
mod curve;
mod range;

pub use calibration::AdcCalibration;
pub use curve::{sharpness_from_cv, ExpCurve};
