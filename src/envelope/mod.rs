//! Envelope core
//!
//! Modes, phase rules, continuity on forced phase changes, the state
//! machine that ties them together, and the trigger/LED outputs it drives.

mod continuity;
mod display;
mod machine;
mod mode;
mod table;
mod triggers;

pub use continuity::amount_into;
pub use display::{DisplayPolicy, DisplayView, LedPattern, LED_COUNT};
pub use machine::{Envelope, EnvelopeState};
pub use mode::{CvValues, Mode, Phase, CV_CHANNELS};
pub use table::{sampled_inputs, should_loop, PhaseTable, Transition};
pub use triggers::{PulseOutput, TriggerOutputs};

/// Free-running microsecond timestamp; expected to wrap
pub type Micros = u32;
