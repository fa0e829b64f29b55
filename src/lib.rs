//! Contour - Four-mode envelope generator
//!
//! The control core of a Eurorack-style envelope module: ADSR, AARR, a
//! looping AARR and a looping trapezoid, with curved segments, seamless
//! retriggering, end-of-phase triggers and an LED display. A scenario
//! simulator drives the same core off-hardware.

pub mod config;
pub mod engine;
pub mod envelope;
pub mod inputs;
pub mod scenario;
pub mod shaping;

pub use config::ContourConfig;
pub use engine::Engine;
pub use envelope::{Envelope, Mode, Phase};
