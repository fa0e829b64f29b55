//! Event latch for interrupt-driven inputs
//!
//! Interrupt handlers only set flags here. The control loop drains them
//! with [`PendingEvents::apply`], so the envelope keeps a single mutator.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::envelope::Envelope;
use crate::inputs::CvSource;

/// Input events waiting for the control loop
#[derive(Debug, Default)]
pub struct PendingEvents {
    gate_level: AtomicBool,
    gate_changed: AtomicBool,
    ping: AtomicBool,
    mode: AtomicBool,
}

impl PendingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate input changed to `level`
    pub fn gate(&self, level: bool) {
        self.gate_level.store(level, Ordering::Release);
        self.gate_changed.store(true, Ordering::Release);
    }

    /// Ping input fired
    pub fn ping(&self) {
        self.ping.store(true, Ordering::Release);
    }

    /// Mode button pressed
    pub fn mode_button(&self) {
        self.mode.store(true, Ordering::Release);
    }

    pub fn is_empty(&self) -> bool {
        !self.gate_changed.load(Ordering::Acquire)
            && !self.ping.load(Ordering::Acquire)
            && !self.mode.load(Ordering::Acquire)
    }

    /// Deliver pending events to `envelope` and clear them
    ///
    /// Order is mode button, gate, ping. Repeated events of one kind since
    /// the last drain collapse into one; a gate change delivers the latest
    /// level. Returns the number of events delivered.
    pub fn apply<C: CvSource>(&self, envelope: &mut Envelope<C>) -> usize {
        let mut delivered = 0;
        if self.mode.swap(false, Ordering::AcqRel) {
            envelope.cycle_mode();
            delivered += 1;
        }
        if self.gate_changed.swap(false, Ordering::AcqRel) {
            envelope.set_gate(self.gate_level.load(Ordering::Acquire));
            delivered += 1;
        }
        if self.ping.swap(false, Ordering::AcqRel) {
            envelope.ping();
            delivered += 1;
        }
        delivered
    }
}
