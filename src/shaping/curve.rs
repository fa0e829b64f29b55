//! Exponential segment curves
//!
//! Shapes normalized phase progress into a concave or convex ramp:
//!
//!   shape(t, k) = (exp(c*k*t) - 1) / (exp(c*k) - 1)
//!
//! where `k` in [-1, 1] sets the bend (positive bows down, negative bows up)
//! and `c` is the rate scale. Small `|k|` degrades to a linear ramp, which
//! sidesteps the 0/0 at `k = 0`.

use crate::config::CurveConfig;

/// Map a normalized CV in [0, 1] to a curve sharpness in [-1, 1]
pub fn sharpness_from_cv(cv: f64) -> f64 {
    (cv.clamp(0.0, 1.0) * 2.0 - 1.0).clamp(-1.0, 1.0)
}

/// Exponential curve with a fixed rate scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpCurve {
    rate_scale: f64,
    linear_threshold: f64,
}

impl ExpCurve {
    /// Create a curve from a rate scale and linear fallback threshold
    pub fn new(rate_scale: f64, linear_threshold: f64) -> Self {
        Self {
            rate_scale,
            linear_threshold: linear_threshold.max(0.0),
        }
    }

    pub fn from_config(config: &CurveConfig) -> Self {
        Self::new(config.rate_scale, config.linear_threshold)
    }

    /// Exponent applied at full sharpness
    pub fn rate_scale(&self) -> f64 {
        self.rate_scale
    }

    fn is_linear(&self, k: f64) -> bool {
        k.abs() < self.linear_threshold
    }

    /// Shape progress `t` with sharpness `k`
    ///
    /// Returns a value in [0, 1] with `shape(0) = 0` and `shape(1) = 1`.
    pub fn shape(&self, t: f64, k: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let k = k.clamp(-1.0, 1.0);
        if self.is_linear(k) {
            return t;
        }

        let rate = self.rate_scale * k;
        if rate.abs() < f64::EPSILON || !rate.is_finite() {
            return t;
        }
        let x = if rate > 0.0 {
            // Scaled through by exp(-rate) so steep curves cannot overflow
            (rate * (t - 1.0)).exp() * (-rate * t).exp_m1() / (-rate).exp_m1()
        } else {
            (rate * t).exp_m1() / rate.exp_m1()
        };
        if x.is_nan() {
            t
        } else {
            x.clamp(0.0, 1.0)
        }
    }

    /// Inverse of [`shape`](Self::shape): the progress that produces `x`
    pub fn unshape(&self, x: f64, k: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        let k = k.clamp(-1.0, 1.0);
        if self.is_linear(k) {
            return x;
        }

        let rate = self.rate_scale * k;
        if rate.abs() < f64::EPSILON || !rate.is_finite() {
            return x;
        }
        let t = if rate > 0.0 {
            1.0 + ((1.0 - x) * (-rate).exp_m1()).ln_1p() / rate
        } else {
            (rate.exp_m1() * x).ln_1p() / rate
        };
        if t.is_nan() {
            x
        } else {
            t.clamp(0.0, 1.0)
        }
    }
}

impl Default for ExpCurve {
    fn default() -> Self {
        Self::from_config(&CurveConfig::default())
    }
}
