//! Envelope state machine
//!
//! Owns the mode, phase, output value and phase timing of one envelope and
//! advances them on every tick. Gate, ping and mode-button events force
//! phase changes out of band; every forced change re-enters the target
//! phase at the point that matches the current output unless a hard reset
//! is requested.

use tracing::{debug, info, trace, warn};

use super::continuity::amount_into;
use super::display::{DisplayPolicy, DisplayView, LedPattern};
use super::mode::{CvValues, Mode, Phase};
use super::table::{sampled_inputs, should_loop, PhaseTable};
use super::triggers::TriggerOutputs;
use super::Micros;
use crate::config::{ContourConfig, LoopConfig};
use crate::inputs::CvSource;

/// Everything that changes while the envelope runs
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeState {
    pub mode: Mode,
    pub phase: Phase,
    /// Last computed output, in [0, 1]
    pub value: f64,
    /// When the current phase was entered
    pub phase_start: Micros,
    /// Progress already covered on entry; negative when the phase was
    /// entered ahead of its ramp
    pub phase_offset: f64,
    /// Length of the current phase in µs; infinite while holding
    pub phase_duration: f64,
    pub gate_open: bool,
    /// Last sampled CV inputs
    pub cv: CvValues,
    /// Timestamp of the latest tick
    pub now: Micros,
    pub last_mode_change: Micros,
}

impl EnvelopeState {
    fn new(mode: Mode, now: Micros) -> Self {
        Self {
            mode,
            phase: Phase::Off,
            value: 0.0,
            phase_start: now,
            phase_offset: 0.0,
            phase_duration: f64::INFINITY,
            gate_open: false,
            cv: CvValues::default(),
            now,
            last_mode_change: now,
        }
    }
}

/// A single envelope generator
pub struct Envelope<C> {
    table: PhaseTable,
    looping: LoopConfig,
    display: DisplayPolicy,
    triggers: TriggerOutputs,
    cv_source: C,
    state: EnvelopeState,
}

impl<C: CvSource> Envelope<C> {
    /// Create an envelope at rest in the configured default mode
    pub fn new(config: &ContourConfig, cv_source: C) -> Self {
        Self::starting_at(config, cv_source, 0)
    }

    /// Like [`Envelope::new`], powering up at timestamp `now`
    pub fn starting_at(config: &ContourConfig, cv_source: C, now: Micros) -> Self {
        let mut envelope = Self {
            table: PhaseTable::from_config(config),
            looping: config.looping,
            display: DisplayPolicy::from_config(&config.display),
            triggers: TriggerOutputs::from_config(&config.triggers),
            cv_source,
            state: EnvelopeState::new(config.default_mode, now),
        };
        envelope.go_to_phase(Phase::Off, true);
        envelope
    }

    /// Advance to `now` and return the output value
    ///
    /// May be called at any interval; timestamps are allowed to wrap.
    pub fn tick(&mut self, now: Micros) -> f64 {
        self.state.now = now;
        self.triggers.update(now);

        let t = self.progress();
        let should_loop = self.should_loop();
        let state = &self.state;
        let transition = self.table.transition(
            state.mode,
            state.phase,
            t,
            &state.cv,
            state.gate_open,
            should_loop,
        );

        self.state.value = transition.value;
        if let Some(next) = transition.next {
            if next != self.state.phase {
                self.go_to_phase(next, false);
            }
        }
        self.state.value
    }

    /// Gate input changed
    ///
    /// Opening the gate starts an attack and closing it starts a release.
    /// Looping modes set to loop while the gate is off swap the two: opening
    /// the gate sends the loop into its release and closing it restarts the
    /// attack. While the gate is held the trapezoid loop rests in its delay
    /// phase (if the delay is longer than zero); the AARR loop has no rest
    /// phase and keeps cycling.
    pub fn set_gate(&mut self, on: bool) {
        self.state.gate_open = on;
        let swapped = self.state.mode.is_looping() && self.looping.loop_when_gate_off;
        let target = if on != swapped { Phase::Attack } else { Phase::Release };
        self.go_to_phase(target, false);
    }

    /// Ping input fired: restart the attack
    ///
    /// Looping modes with hard sync restart from zero so the loop locks to
    /// the ping clock.
    pub fn ping(&mut self) {
        let hard_reset = self.state.mode.is_looping() && self.looping.hard_sync_on_ping;
        self.go_to_phase(Phase::Attack, hard_reset);
    }

    /// Mode button pressed: select the next mode and return it
    pub fn cycle_mode(&mut self) -> Mode {
        let mode = self.state.mode.next();
        self.state.mode = mode;
        self.state.last_mode_change = self.state.now;
        self.state.value = 0.0;
        info!(%mode, "mode changed");
        self.go_to_phase(Phase::Off, true);
        mode
    }

    fn go_to_phase(&mut self, target: Phase, hard_reset: bool) {
        let mode = self.state.mode;
        let previous = self.state.phase;

        let mut phase = target;
        let mut entered_attack = false;
        let mut entered_release = false;
        let mut settled = None;
        for _ in 0..Phase::COUNT {
            self.sample_cv(phase);
            let duration = self.table.duration(mode, phase, &self.state.cv);
            entered_attack |= phase == Phase::Attack;
            entered_release |= phase == Phase::Release;
            if duration > 0.0 {
                settled = Some((phase, duration));
                break;
            }
            trace!(%mode, %phase, "passing through zero-length phase");
            phase = phase.next();
        }

        let (phase, duration) = match settled {
            Some(found) => found,
            None => {
                warn!(%mode, "every phase has zero length, holding in off");
                (Phase::Off, f64::INFINITY)
            }
        };

        let now = self.state.now;
        self.state.phase = phase;
        self.state.phase_duration = duration;
        self.state.phase_start = now;
        self.state.phase_offset = if hard_reset || duration.is_infinite() {
            0.0
        } else {
            amount_into(self.table.curve(), mode, phase, self.state.value, &self.state.cv)
        };

        if settled.is_some() {
            if entered_attack {
                self.triggers.end_of_release.fire(now);
            }
            if entered_release {
                self.triggers.end_of_fall.fire(now);
            }
        }

        debug!(
            %mode,
            from = %previous,
            to = %phase,
            duration_us = duration,
            hard_reset,
            "phase change"
        );
    }

    fn sample_cv(&mut self, phase: Phase) {
        for &channel in sampled_inputs(self.state.mode, phase) {
            let reading = self.cv_source.read_cv(channel);
            self.state.cv.set(channel, reading);
        }
    }
}

impl<C> Envelope<C> {
    /// Progress through the current phase; past 1 once it has run out
    fn progress(&self) -> f64 {
        let duration = self.state.phase_duration;
        if duration <= 0.0 {
            return 1.0;
        }
        if duration.is_infinite() {
            return 0.0;
        }
        let elapsed = self.state.now.wrapping_sub(self.state.phase_start) as f64;
        self.state.phase_offset + elapsed / duration
    }

    fn should_loop(&self) -> bool {
        should_loop(self.state.gate_open, self.looping.loop_when_gate_off)
    }

    fn since_mode_change(&self) -> Micros {
        self.state.now.wrapping_sub(self.state.last_mode_change)
    }

    pub fn state(&self) -> &EnvelopeState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn value(&self) -> f64 {
        self.state.value
    }

    pub fn gate_open(&self) -> bool {
        self.state.gate_open
    }

    /// LEDs to light for the current mode/phase
    pub fn led_pattern(&self) -> LedPattern {
        self.display
            .pattern(self.state.mode, self.state.phase, self.since_mode_change())
    }

    pub fn display_view(&self) -> DisplayView {
        self.display.view(self.since_mode_change())
    }

    pub fn mode_indicator(&self) -> bool {
        self.display.mode_indicator(self.since_mode_change())
    }

    /// End-of-release trigger output level
    pub fn end_of_release(&self) -> bool {
        self.triggers.end_of_release.is_high()
    }

    /// End-of-fall trigger output level
    pub fn end_of_fall(&self) -> bool {
        self.triggers.end_of_fall.is_high()
    }

    pub fn cv_source(&self) -> &C {
        &self.cv_source
    }

    pub fn cv_source_mut(&mut self) -> &mut C {
        &mut self.cv_source
    }
}
