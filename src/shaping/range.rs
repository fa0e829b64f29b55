//! CV-to-duration interpolation

use crate::config::DurationRange;

impl DurationRange {
    /// Interpolate a normalized CV into this range, in microseconds
    pub fn lerp(&self, cv: f64) -> f64 {
        self.lerp_scaled(cv, 1.0)
    }

    /// Interpolate into `[min, max * scale]`
    ///
    /// Used where another CV stretches the top of the range (the ADSR
    /// release is scaled by the sustain level it falls from).
    pub fn lerp_scaled(&self, cv: f64, scale: f64) -> f64 {
        let cv = cv.clamp(0.0, 1.0);
        let min = self.min_micros as f64;
        let max = self.max_micros as f64 * scale.clamp(0.0, 1.0);
        (min + cv * (max - min)).max(0.0)
    }
}
