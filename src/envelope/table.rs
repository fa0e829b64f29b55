//! Per-mode phase rules
//!
//! For every `(mode, phase)` pair this decides how long the phase lasts,
//! what the output is at a given progress and where the envelope goes when
//! the phase ends, plus which CV inputs are read on entry.
//!
//! Knob assignment:
//!
//! | Mode              | CV0         | CV1          | CV2           | CV3           |
//! |-------------------|-------------|--------------|---------------|---------------|
//! | ADSR              | attack time | decay time   | sustain level | release time  |
//! | AARR, AARR loop   | attack time | attack curve | release time  | release curve |
//! | Trapezoid loop    | attack time | hold time    | release time  | delay time    |

use super::mode::{CvValues, Mode, Phase};
use crate::config::{ContourConfig, TimingConfig};
use crate::shaping::{sharpness_from_cv, ExpCurve};

const ATTACK_TIME: usize = 0;

const ADSR_DECAY_TIME: usize = 1;
const ADSR_SUSTAIN_LEVEL: usize = 2;
const ADSR_RELEASE_TIME: usize = 3;

const AR_ATTACK_CURVE: usize = 1;
const AR_RELEASE_TIME: usize = 2;
const AR_RELEASE_CURVE: usize = 3;

const TRAP_HOLD_TIME: usize = 1;
const TRAP_RELEASE_TIME: usize = 2;
const TRAP_DELAY_TIME: usize = 3;

/// Output of a phase at some progress, and the phase to move to if it ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub value: f64,
    pub next: Option<Phase>,
}

impl Transition {
    fn stay(value: f64) -> Self {
        Self { value, next: None }
    }

    fn to(value: f64, next: Phase) -> Self {
        Self { value, next: Some(next) }
    }
}

/// Whether a looping mode should start another cycle
///
/// Loops run while the gate is low when `loop_when_gate_off` is set, and
/// while it is high otherwise.
pub fn should_loop(gate_open: bool, loop_when_gate_off: bool) -> bool {
    (!gate_open && loop_when_gate_off) || (gate_open && !loop_when_gate_off)
}

/// CV channels read when entering `phase` in `mode`
///
/// Inputs are only read here, never mid-phase, so a wobbly knob cannot
/// make the output jump.
pub fn sampled_inputs(mode: Mode, phase: Phase) -> &'static [usize] {
    match (mode, phase) {
        (Mode::Adsr, Phase::Attack) => &[ATTACK_TIME],
        // Leaving decay early depends on the sustain target
        (Mode::Adsr, Phase::Decay) => &[ADSR_DECAY_TIME, ADSR_SUSTAIN_LEVEL],
        (Mode::Adsr, Phase::Sustain) => &[ADSR_SUSTAIN_LEVEL],
        (Mode::Adsr, Phase::Release) => &[ADSR_SUSTAIN_LEVEL, ADSR_RELEASE_TIME],

        (Mode::Aarr | Mode::AarrLoop, Phase::Attack) => &[ATTACK_TIME, AR_ATTACK_CURVE],
        (Mode::Aarr | Mode::AarrLoop, Phase::Release) => &[AR_RELEASE_TIME, AR_RELEASE_CURVE],

        (Mode::TrapLoop, Phase::Attack) => &[ATTACK_TIME],
        (Mode::TrapLoop, Phase::Sustain) => &[TRAP_HOLD_TIME],
        (Mode::TrapLoop, Phase::Release) => &[TRAP_RELEASE_TIME],
        (Mode::TrapLoop, Phase::Off) => &[TRAP_DELAY_TIME],

        _ => &[],
    }
}

/// Phase rules for all modes, parameterized by the timing and curve settings
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTable {
    timing: TimingConfig,
    curve: ExpCurve,
}

impl PhaseTable {
    pub fn new(timing: TimingConfig, curve: ExpCurve) -> Self {
        Self { timing, curve }
    }

    pub fn from_config(config: &ContourConfig) -> Self {
        Self::new(config.timing.clone(), ExpCurve::from_config(&config.curve))
    }

    pub fn curve(&self) -> &ExpCurve {
        &self.curve
    }

    /// ADSR sustain level
    pub fn sustain_level(cv: &CvValues) -> f64 {
        cv.get(ADSR_SUSTAIN_LEVEL)
    }

    /// Sharpness of the AARR attack curve
    pub fn attack_sharpness(cv: &CvValues) -> f64 {
        sharpness_from_cv(cv.get(AR_ATTACK_CURVE))
    }

    /// Sharpness of the AARR release curve
    pub fn release_sharpness(cv: &CvValues) -> f64 {
        sharpness_from_cv(cv.get(AR_RELEASE_CURVE))
    }

    /// Full length of `phase` in microseconds
    ///
    /// `f64::INFINITY` marks a phase held until an external event; 0 marks a
    /// passthrough phase that is skipped on entry.
    pub fn duration(&self, mode: Mode, phase: Phase, cv: &CvValues) -> f64 {
        let timing = &self.timing;
        match mode {
            Mode::Adsr => match phase {
                Phase::Attack => timing.attack.lerp(cv.get(ATTACK_TIME)),
                Phase::Decay => timing.decay.lerp(cv.get(ADSR_DECAY_TIME)),
                Phase::Sustain => f64::INFINITY,
                // Falling from a lower sustain level takes proportionally less time
                Phase::Release => timing
                    .release
                    .lerp_scaled(cv.get(ADSR_RELEASE_TIME), Self::sustain_level(cv)),
                Phase::Off => f64::INFINITY,
            },
            Mode::Aarr => match phase {
                Phase::Attack => timing.attack.lerp(cv.get(ATTACK_TIME)),
                Phase::Decay => 0.0,
                Phase::Sustain => f64::INFINITY,
                Phase::Release => timing.release.lerp(cv.get(AR_RELEASE_TIME)),
                Phase::Off => f64::INFINITY,
            },
            Mode::AarrLoop => match phase {
                Phase::Attack => timing.attack.lerp(cv.get(ATTACK_TIME)),
                Phase::Decay | Phase::Sustain | Phase::Off => 0.0,
                Phase::Release => timing.release.lerp(cv.get(AR_RELEASE_TIME)),
            },
            Mode::TrapLoop => match phase {
                Phase::Attack => timing.attack.lerp(cv.get(ATTACK_TIME)),
                Phase::Decay => 0.0,
                Phase::Sustain => timing.sustain.lerp(cv.get(TRAP_HOLD_TIME)),
                Phase::Release => timing.release.lerp(cv.get(TRAP_RELEASE_TIME)),
                Phase::Off => timing.delay.lerp(cv.get(TRAP_DELAY_TIME)),
            },
        }
    }

    /// Output at progress `t` through `phase`, and the successor once it ends
    pub fn transition(
        &self,
        mode: Mode,
        phase: Phase,
        t: f64,
        cv: &CvValues,
        gate_open: bool,
        should_loop: bool,
    ) -> Transition {
        let transition = match mode {
            Mode::Adsr => self.adsr(phase, t, cv, gate_open),
            Mode::Aarr => self.aarr(phase, t, cv, gate_open),
            Mode::AarrLoop => self.aarr_loop(phase, t, cv, should_loop),
            Mode::TrapLoop => Self::trap_loop(phase, t, should_loop),
        };
        let value = if transition.value.is_nan() {
            0.0
        } else {
            transition.value.clamp(0.0, 1.0)
        };
        Transition { value, ..transition }
    }

    fn adsr(&self, phase: Phase, t: f64, cv: &CvValues, gate_open: bool) -> Transition {
        let sustain = Self::sustain_level(cv);
        match phase {
            Phase::Attack => {
                if t >= 1.0 {
                    Transition::to(1.0, if gate_open { Phase::Decay } else { Phase::Release })
                } else {
                    Transition::stay(t)
                }
            }
            Phase::Decay => {
                let x = 1.0 - (1.0 - sustain) * t;
                if x <= sustain {
                    Transition::to(sustain, Phase::Sustain)
                } else {
                    Transition::stay(x)
                }
            }
            Phase::Sustain => Transition::stay(sustain),
            Phase::Release => {
                let x = sustain - sustain * t;
                if x <= 0.0 {
                    Transition::to(0.0, Phase::Off)
                } else {
                    Transition::stay(x)
                }
            }
            Phase::Off => Transition::stay(0.0),
        }
    }

    fn aarr(&self, phase: Phase, t: f64, cv: &CvValues, gate_open: bool) -> Transition {
        match phase {
            Phase::Attack => {
                if t >= 1.0 {
                    Transition::to(1.0, if gate_open { Phase::Sustain } else { Phase::Release })
                } else {
                    Transition::stay(self.curve.shape(t, Self::attack_sharpness(cv)))
                }
            }
            Phase::Decay => Transition::to(1.0, Phase::Sustain),
            Phase::Sustain => Transition::stay(1.0),
            Phase::Release => self.curved_release(t, cv, Phase::Off),
            Phase::Off => Transition::stay(0.0),
        }
    }

    fn aarr_loop(&self, phase: Phase, t: f64, cv: &CvValues, should_loop: bool) -> Transition {
        match phase {
            Phase::Attack => {
                if t >= 1.0 {
                    Transition::to(1.0, Phase::Release)
                } else {
                    Transition::stay(self.curve.shape(t, Self::attack_sharpness(cv)))
                }
            }
            Phase::Decay | Phase::Sustain => Transition::to(1.0, Phase::Release),
            Phase::Release => {
                let next = if should_loop { Phase::Attack } else { Phase::Off };
                self.curved_release(t, cv, next)
            }
            Phase::Off => {
                if should_loop {
                    Transition::to(0.0, Phase::Attack)
                } else {
                    Transition::stay(0.0)
                }
            }
        }
    }

    fn curved_release(&self, t: f64, cv: &CvValues, next: Phase) -> Transition {
        if t >= 1.0 {
            Transition::to(0.0, next)
        } else {
            Transition::stay(1.0 - self.curve.shape(t, Self::release_sharpness(cv)))
        }
    }

    fn trap_loop(phase: Phase, t: f64, should_loop: bool) -> Transition {
        match phase {
            Phase::Attack => {
                if t >= 1.0 {
                    Transition::to(1.0, Phase::Sustain)
                } else {
                    Transition::stay(t)
                }
            }
            Phase::Decay => Transition::to(1.0, Phase::Sustain),
            Phase::Sustain => {
                if t >= 1.0 {
                    Transition::to(1.0, Phase::Release)
                } else {
                    Transition::stay(1.0)
                }
            }
            Phase::Release => {
                if t >= 1.0 {
                    Transition::to(0.0, Phase::Off)
                } else {
                    Transition::stay(1.0 - t)
                }
            }
            Phase::Off => {
                if t >= 1.0 && should_loop {
                    Transition::to(0.0, Phase::Attack)
                } else {
                    Transition::stay(0.0)
                }
            }
        }
    }
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self::from_config(&ContourConfig::default())
    }
}
