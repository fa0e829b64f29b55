//! Scenario playback

use serde::Serialize;

use super::{Scenario, ScenarioError, ScenarioEvent};
use crate::config::ContourConfig;
use crate::engine::{DigitalInputs, Engine};
use crate::envelope::{DisplayView, LedPattern, Micros, Mode, Phase};
use crate::inputs::FixedCv;

/// Snapshot of the module after one control loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    /// Microseconds since the start of the scenario
    pub time_micros: u64,
    pub value: f64,
    pub mode: Mode,
    pub phase: Phase,
    pub leds: LedPattern,
    pub display: DisplayView,
    pub end_of_release: bool,
    pub end_of_fall: bool,
}

/// Plays a scenario against an engine, one frame per tick
pub struct Simulator {
    engine: Engine<FixedCv>,
    events: Vec<ScenarioEvent>,
    next_event: usize,
    gate: bool,
    start: Micros,
    tick: u64,
    elapsed: u64,
    end: u64,
}

impl Simulator {
    pub fn new(config: &ContourConfig, scenario: &Scenario) -> Result<Self, ScenarioError> {
        scenario.validate()?;

        let mut events = scenario.events.clone();
        // Stable, so events sharing a timestamp keep their file order
        events.sort_by_key(ScenarioEvent::at_ms);

        let knobs = FixedCv::new(scenario.knobs);
        Ok(Self {
            engine: Engine::starting_at(config, knobs, scenario.start_micros),
            events,
            next_event: 0,
            gate: false,
            start: scenario.start_micros,
            tick: scenario.tick_micros as u64,
            elapsed: 0,
            end: scenario.duration_ms.saturating_mul(1000),
        })
    }

    pub fn engine(&self) -> &Engine<FixedCv> {
        &self.engine
    }

    /// Collect the inputs for this tick from every event that is due
    fn due_inputs(&mut self) -> DigitalInputs {
        let mut inputs = DigitalInputs {
            gate: self.gate,
            ..DigitalInputs::default()
        };
        while let Some(&event) = self.events.get(self.next_event) {
            if event.at_ms().saturating_mul(1000) > self.elapsed {
                break;
            }
            match event {
                ScenarioEvent::Gate { on, .. } => {
                    inputs.gate = on;
                    self.gate = on;
                }
                ScenarioEvent::Ping { .. } => inputs.ping = true,
                ScenarioEvent::CycleMode { .. } => inputs.mode_button = true,
                ScenarioEvent::Knob { channel, value, .. } => {
                    self.engine.envelope_mut().cv_source_mut().set(channel, value);
                }
            }
            self.next_event += 1;
        }
        inputs
    }
}

impl Iterator for Simulator {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.elapsed >= self.end {
            return None;
        }

        let inputs = self.due_inputs();
        // Truncation wraps the same way the hardware timer does
        let now = self.start.wrapping_add(self.elapsed as Micros);
        let outputs = self.engine.poll(now, inputs);

        let envelope = self.engine.envelope();
        let frame = Frame {
            time_micros: self.elapsed,
            value: outputs.value,
            mode: envelope.mode(),
            phase: envelope.phase(),
            leds: outputs.leds,
            display: envelope.display_view(),
            end_of_release: outputs.end_of_release,
            end_of_fall: outputs.end_of_fall,
        };
        self.elapsed = self.elapsed.saturating_add(self.tick);
        Some(frame)
    }
}
