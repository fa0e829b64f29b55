//! Seamless phase re-entry
//!
//! When the envelope is forced into a phase mid-flight (a retrigger during
//! decay, a gate release during attack), starting that phase from zero would
//! make the output jump. Instead the phase is entered at the progress where
//! its own curve already equals the current output.

use super::mode::{CvValues, Mode, Phase};
use super::table::PhaseTable;
use crate::shaping::ExpCurve;

/// Progress at which entering `phase` reproduces `value`
///
/// Holding and passthrough phases start at 0. Where the inverse would divide
/// by zero (ADSR release from a zero sustain, ADSR decay to a full sustain)
/// the phase counts as already complete.
///
/// The result is in [0, 1] except for an ADSR release from above the
/// sustain level, which is negative: the release starts ahead of its own
/// ramp and falls from the current value at the usual slope.
pub fn amount_into(
    curve: &ExpCurve,
    mode: Mode,
    phase: Phase,
    value: f64,
    cv: &CvValues,
) -> f64 {
    let value = value.clamp(0.0, 1.0);
    let amount = match mode {
        Mode::Adsr => {
            let sustain = PhaseTable::sustain_level(cv);
            match phase {
                Phase::Attack => value,
                Phase::Decay => {
                    let span = 1.0 - sustain;
                    if span <= f64::EPSILON {
                        1.0
                    } else {
                        1.0 - (value - sustain) / span
                    }
                }
                Phase::Release => {
                    if sustain <= f64::EPSILON {
                        1.0
                    } else {
                        1.0 - value / sustain
                    }
                }
                Phase::Sustain | Phase::Off => 0.0,
            }
        }
        Mode::TrapLoop => match phase {
            Phase::Attack => value,
            Phase::Release => 1.0 - value,
            Phase::Decay | Phase::Sustain | Phase::Off => 0.0,
        },
        Mode::Aarr | Mode::AarrLoop => match phase {
            Phase::Attack => curve.unshape(value, PhaseTable::attack_sharpness(cv)),
            Phase::Release => curve.unshape(1.0 - value, PhaseTable::release_sharpness(cv)),
            Phase::Decay | Phase::Sustain | Phase::Off => 0.0,
        },
    };
    if mode == Mode::Adsr && phase == Phase::Release {
        amount.min(1.0)
    } else {
        amount.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn adsr_cv(sustain: f64) -> CvValues {
        CvValues::new([0.5, 0.5, sustain, 0.5])
    }

    #[test]
    fn test_adsr_attack_is_value() {
        let curve = ExpCurve::default();
        let amount = amount_into(&curve, Mode::Adsr, Phase::Attack, 0.7, &adsr_cv(0.6));
        assert_eq!(amount, 0.7);
    }

    #[test]
    fn test_adsr_decay_from_peak_starts_at_zero() {
        let curve = ExpCurve::default();
        let amount = amount_into(&curve, Mode::Adsr, Phase::Decay, 1.0, &adsr_cv(0.6));
        assert!(amount.abs() < TOLERANCE);

        let amount = amount_into(&curve, Mode::Adsr, Phase::Decay, 0.8, &adsr_cv(0.6));
        assert!((amount - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_adsr_release_from_sustain_starts_at_zero() {
        let curve = ExpCurve::default();
        let amount = amount_into(&curve, Mode::Adsr, Phase::Release, 0.6, &adsr_cv(0.6));
        assert!(amount.abs() < TOLERANCE);

        let amount = amount_into(&curve, Mode::Adsr, Phase::Release, 0.3, &adsr_cv(0.6));
        assert!((amount - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_zero_denominators_are_complete() {
        let curve = ExpCurve::default();

        let release = amount_into(&curve, Mode::Adsr, Phase::Release, 0.4, &adsr_cv(0.0));
        assert_eq!(release, 1.0);

        let decay = amount_into(&curve, Mode::Adsr, Phase::Decay, 1.0, &adsr_cv(1.0));
        assert_eq!(decay, 1.0);
    }

    #[test]
    fn test_release_above_sustain_starts_early() {
        let curve = ExpCurve::default();
        let table = PhaseTable::default();
        let cv = adsr_cv(0.6);

        let amount = amount_into(&curve, Mode::Adsr, Phase::Release, 0.9, &cv);
        assert!((amount + 0.5).abs() < TOLERANCE);

        let forward = table.transition(Mode::Adsr, Phase::Release, amount, &cv, false, false);
        assert!((forward.value - 0.9).abs() < TOLERANCE);
        assert_eq!(forward.next, None);
    }

    #[test]
    fn test_result_is_clamped() {
        let curve = ExpCurve::default();
        let amount = amount_into(&curve, Mode::Adsr, Phase::Attack, 1.5, &adsr_cv(0.6));
        assert_eq!(amount, 1.0);

        // Decaying from below the sustain level is already complete
        let amount = amount_into(&curve, Mode::Adsr, Phase::Decay, 0.2, &adsr_cv(0.6));
        assert_eq!(amount, 1.0);
    }

    #[test]
    fn test_trap_linear_segments() {
        let curve = ExpCurve::default();
        let cv = CvValues::default();

        assert_eq!(amount_into(&curve, Mode::TrapLoop, Phase::Attack, 0.25, &cv), 0.25);
        assert_eq!(amount_into(&curve, Mode::TrapLoop, Phase::Release, 0.25, &cv), 0.75);
        assert_eq!(amount_into(&curve, Mode::TrapLoop, Phase::Off, 0.25, &cv), 0.0);
    }

    #[test]
    fn test_aarr_curves_reproduce_value() {
        let curve = ExpCurve::default();
        let table = PhaseTable::default();
        let cv = CvValues::new([0.5, 0.8, 0.5, 0.3]);

        for value in [0.1, 0.5, 0.9] {
            let t = amount_into(&curve, Mode::Aarr, Phase::Attack, value, &cv);
            let forward = table.transition(Mode::Aarr, Phase::Attack, t, &cv, true, false);
            assert!((forward.value - value).abs() < 1e-9, "attack {}", value);

            let t = amount_into(&curve, Mode::AarrLoop, Phase::Release, value, &cv);
            let forward = table.transition(Mode::AarrLoop, Phase::Release, t, &cv, false, true);
            assert!((forward.value - value).abs() < 1e-9, "release {}", value);
        }
    }

    #[test]
    fn test_holding_phases_start_at_zero() {
        let curve = ExpCurve::default();
        let cv = CvValues::default();

        for mode in Mode::ALL {
            assert_eq!(amount_into(&curve, mode, Phase::Sustain, 0.5, &cv), 0.0);
            assert_eq!(amount_into(&curve, mode, Phase::Off, 0.5, &cv), 0.0);
        }
    }
}
