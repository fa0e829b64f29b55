//! Scripted input scenarios
//!
//! A scenario describes knob positions and timed gate/ping/button events,
//! which the [`Simulator`] plays against an engine to produce frames for
//! rendering or inspection.

mod simulator;

pub use simulator::{Frame, Simulator};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::envelope::{CvValues, CV_CHANNELS};

/// Longest run or event time, so that microsecond offsets fit in a u64
pub const MAX_SCENARIO_MS: u64 = u64::MAX / 1000;

/// A timed input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScenarioEvent {
    /// Gate goes high or low
    Gate { at_ms: u64, on: bool },
    /// Ping input fires
    Ping { at_ms: u64 },
    /// Mode button pressed
    CycleMode { at_ms: u64 },
    /// A knob is turned
    Knob { at_ms: u64, channel: usize, value: f64 },
}

impl ScenarioEvent {
    /// Milliseconds after the scenario start
    pub fn at_ms(&self) -> u64 {
        match *self {
            ScenarioEvent::Gate { at_ms, .. }
            | ScenarioEvent::Ping { at_ms }
            | ScenarioEvent::CycleMode { at_ms }
            | ScenarioEvent::Knob { at_ms, .. } => at_ms,
        }
    }
}

/// Scripted run of the module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Control loop period
    pub tick_micros: u32,

    /// Total length of the run
    pub duration_ms: u64,

    /// Timer value at the start of the run
    pub start_micros: u32,

    /// Knob positions at power-up
    pub knobs: [f64; CV_CHANNELS],

    pub events: Vec<ScenarioEvent>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            tick_micros: 1000,
            duration_ms: 10_000,
            start_micros: 0,
            knobs: CvValues::default().as_array(),
            events: Vec::new(),
        }
    }
}

/// Reasons a scenario is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("tick period must be at least 1 µs")]
    ZeroTick,

    #[error("knob channel {0} does not exist")]
    KnobChannel(usize),

    #[error("knob {channel} value {value} is outside 0..=1")]
    KnobValue { channel: usize, value: f64 },

    #[error("time {0} ms is past the longest supported run")]
    TooLong(u64),
}

impl Scenario {
    /// Validate the scenario
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.tick_micros == 0 {
            return Err(ScenarioError::ZeroTick);
        }
        if self.duration_ms > MAX_SCENARIO_MS {
            return Err(ScenarioError::TooLong(self.duration_ms));
        }
        for (channel, &value) in self.knobs.iter().enumerate() {
            check_knob(channel, value)?;
        }
        for event in &self.events {
            if event.at_ms() > MAX_SCENARIO_MS {
                return Err(ScenarioError::TooLong(event.at_ms()));
            }
            if let ScenarioEvent::Knob { channel, value, .. } = *event {
                check_knob(channel, value)?;
            }
        }
        Ok(())
    }

    /// Number of frames the run produces
    pub fn frame_count(&self) -> u64 {
        if self.tick_micros == 0 {
            return 0;
        }
        self.duration_ms
            .saturating_mul(1000)
            .div_ceil(self.tick_micros as u64)
    }
}

fn check_knob(channel: usize, value: f64) -> Result<(), ScenarioError> {
    if channel >= CV_CHANNELS {
        return Err(ScenarioError::KnobChannel(channel));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ScenarioError::KnobValue { channel, value });
    }
    Ok(())
}

/// Load a scenario from a YAML file
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file: {:?}", path))?;
    let scenario: Scenario = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse scenario file: {:?}", path))?;
    scenario.validate()?;
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_scenario() {
        let scenario = Scenario::default();

        assert_eq!(scenario.tick_micros, 1000);
        assert_eq!(scenario.frame_count(), 10_000);
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_parse_events() {
        let yaml = r#"
tick_micros: 500
duration_ms: 3000
knobs: [0.1, 0.2, 0.3, 0.4]
events:
  - event: gate
    at_ms: 10
    on: true
  - event: ping
    at_ms: 20
  - event: cycle_mode
    at_ms: 30
  - event: knob
    at_ms: 40
    channel: 2
    value: 0.75
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(scenario.frame_count(), 6000);
        assert_eq!(scenario.start_micros, 0);
        assert_eq!(
            scenario.events,
            vec![
                ScenarioEvent::Gate { at_ms: 10, on: true },
                ScenarioEvent::Ping { at_ms: 20 },
                ScenarioEvent::CycleMode { at_ms: 30 },
                ScenarioEvent::Knob { at_ms: 40, channel: 2, value: 0.75 },
            ]
        );
        assert_eq!(scenario.events[3].at_ms(), 40);
    }

    #[test]
    fn test_example_scenario_is_valid() {
        let scenario: Scenario =
            serde_yaml::from_str(include_str!("../../scenario.example.yaml")).unwrap();
        assert!(scenario.validate().is_ok());
        assert_eq!(scenario.frame_count(), 20_000);
    }

    #[test]
    fn test_validate_tick() {
        let scenario = Scenario {
            tick_micros: 0,
            ..Scenario::default()
        };
        assert_eq!(scenario.validate(), Err(ScenarioError::ZeroTick));
        assert_eq!(scenario.frame_count(), 0);
    }

    #[test]
    fn test_validate_knobs() {
        let mut scenario = Scenario::default();
        scenario.knobs[1] = 1.5;
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::KnobValue { channel: 1, value: 1.5 })
        );

        let scenario = Scenario {
            events: vec![ScenarioEvent::Knob { at_ms: 0, channel: 4, value: 0.5 }],
            ..Scenario::default()
        };
        assert_eq!(scenario.validate(), Err(ScenarioError::KnobChannel(4)));
    }

    #[test]
    fn test_validate_run_length() {
        let scenario = Scenario {
            duration_ms: u64::MAX,
            ..Scenario::default()
        };
        assert_eq!(scenario.validate(), Err(ScenarioError::TooLong(u64::MAX)));
        assert_eq!(scenario.frame_count(), u64::MAX.div_ceil(1000));

        let scenario = Scenario {
            events: vec![ScenarioEvent::Ping { at_ms: MAX_SCENARIO_MS + 1 }],
            ..Scenario::default()
        };
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::TooLong(MAX_SCENARIO_MS + 1))
        );

        let scenario = Scenario {
            duration_ms: MAX_SCENARIO_MS,
            ..Scenario::default()
        };
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_load_scenario_file() {
        let yaml = r#"
duration_ms: 250
events:
  - event: gate
    at_ms: 0
    on: true
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.duration_ms, 250);
        assert_eq!(scenario.events.len(), 1);
    }

    #[test]
    fn test_load_rejects_invalid_scenario() {
        let yaml = "tick_micros: 0\n";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let err = load_scenario(file.path()).unwrap_err();
        assert!(err.to_string().contains("tick period"));
    }
}
