//! LED bank display policy
//!
//! Four LEDs show either the selected mode (one LED per mode) or the active
//! phase. The mode is shown for a while after every mode change, then the
//! display falls back to the phase.

use serde::Serialize;
use std::fmt;

use super::mode::{Mode, Phase};
use super::Micros;
use crate::config::DisplayConfig;

/// Number of LEDs in the bank
pub const LED_COUNT: usize = 4;

/// On/off state of the LED bank; bit `i` drives LED `i`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct LedPattern(u8);

impl LedPattern {
    pub const OFF: LedPattern = LedPattern(0);

    const fn from_leds(leds: [u8; LED_COUNT]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < LED_COUNT {
            if leds[i] != 0 {
                bits |= 1u8 << i;
            }
            i += 1;
        }
        LedPattern(bits)
    }

    /// Only LED `index` lit
    pub fn one_hot(index: usize) -> Self {
        if index < LED_COUNT {
            LedPattern(1u8 << index)
        } else {
            LedPattern::OFF
        }
    }

    pub fn is_lit(&self, led: usize) -> bool {
        led < LED_COUNT && self.0 & (1u8 << led) != 0
    }

    pub fn leds(&self) -> [bool; LED_COUNT] {
        std::array::from_fn(|led| self.is_lit(led))
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for LedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lit in self.leds() {
            f.write_str(if lit { "●" } else { "○" })?;
        }
        Ok(())
    }
}

/// Phase patterns per mode, rows in [`Phase::ALL`] order
const PHASE_PATTERNS: [[LedPattern; Phase::COUNT]; 4] = [
    // ADSR: one LED per stage
    [
        LedPattern::from_leds([1, 0, 0, 0]),
        LedPattern::from_leds([0, 1, 0, 0]),
        LedPattern::from_leds([0, 0, 1, 0]),
        LedPattern::from_leds([0, 0, 0, 1]),
        LedPattern::from_leds([0, 0, 0, 0]),
    ],
    // AARR: left pair rising, right pair falling, all lit while held
    [
        LedPattern::from_leds([1, 1, 0, 0]),
        LedPattern::from_leds([0, 0, 0, 0]),
        LedPattern::from_leds([1, 1, 1, 1]),
        LedPattern::from_leds([0, 0, 1, 1]),
        LedPattern::from_leds([0, 0, 0, 0]),
    ],
    // AARR loop
    [
        LedPattern::from_leds([1, 1, 0, 0]),
        LedPattern::from_leds([0, 0, 0, 0]),
        LedPattern::from_leds([0, 0, 0, 0]),
        LedPattern::from_leds([0, 0, 1, 1]),
        LedPattern::from_leds([0, 0, 0, 0]),
    ],
    // Trapezoid: attack, hold, release, delay
    [
        LedPattern::from_leds([1, 0, 0, 0]),
        LedPattern::from_leds([0, 0, 0, 0]),
        LedPattern::from_leds([0, 1, 0, 0]),
        LedPattern::from_leds([0, 0, 1, 0]),
        LedPattern::from_leds([0, 0, 0, 1]),
    ],
];

/// What the LED bank is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayView {
    Mode,
    Phase,
}

/// Chooses between the mode and phase views
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPolicy {
    show_mode_for: Micros,
    mode_indicator: bool,
}

impl DisplayPolicy {
    pub fn new(show_mode_for: Micros, mode_indicator: bool) -> Self {
        Self {
            show_mode_for,
            mode_indicator,
        }
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.show_mode_micros, config.mode_indicator)
    }

    pub fn view(&self, since_mode_change: Micros) -> DisplayView {
        if since_mode_change < self.show_mode_for {
            DisplayView::Mode
        } else {
            DisplayView::Phase
        }
    }

    pub fn pattern(&self, mode: Mode, phase: Phase, since_mode_change: Micros) -> LedPattern {
        match self.view(since_mode_change) {
            DisplayView::Mode => LedPattern::one_hot(mode.index()),
            DisplayView::Phase => PHASE_PATTERNS[mode.index()][phase.index()],
        }
    }

    /// Level of the separate mode indicator output, when fitted
    pub fn mode_indicator(&self, since_mode_change: Micros) -> bool {
        self.mode_indicator && self.view(since_mode_change) == DisplayView::Mode
    }
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_shown_during_dwell() {
        let policy = DisplayPolicy::new(2_000_000, false);

        assert_eq!(policy.view(0), DisplayView::Mode);
        assert_eq!(policy.view(1_999_999), DisplayView::Mode);
        assert_eq!(policy.view(2_000_000), DisplayView::Phase);
    }

    #[test]
    fn test_mode_patterns_are_one_hot() {
        let policy = DisplayPolicy::default();

        for mode in Mode::ALL {
            let pattern = policy.pattern(mode, Phase::Attack, 0);
            assert_eq!(pattern, LedPattern::one_hot(mode.index()));
            assert_eq!(pattern.leds().iter().filter(|&&lit| lit).count(), 1);
        }
    }

    #[test]
    fn test_phase_patterns() {
        let policy = DisplayPolicy::new(0, false);

        assert_eq!(policy.pattern(Mode::Adsr, Phase::Decay, 5).leds(), [false, true, false, false]);
        assert_eq!(policy.pattern(Mode::Aarr, Phase::Sustain, 5).leds(), [true; 4]);
        assert_eq!(policy.pattern(Mode::AarrLoop, Phase::Release, 5).leds(), [false, false, true, true]);
        assert_eq!(policy.pattern(Mode::TrapLoop, Phase::Off, 5).leds(), [false, false, false, true]);
        assert_eq!(policy.pattern(Mode::Adsr, Phase::Off, 5), LedPattern::OFF);
    }

    #[test]
    fn test_mode_indicator() {
        let fitted = DisplayPolicy::new(1000, true);
        assert!(fitted.mode_indicator(10));
        assert!(!fitted.mode_indicator(1000));

        let absent = DisplayPolicy::new(1000, false);
        assert!(!absent.mode_indicator(10));
    }

    #[test]
    fn test_pattern_display() {
        assert_eq!(LedPattern::one_hot(1).to_string(), "○●○○");
        assert_eq!(LedPattern::one_hot(9), LedPattern::OFF);
        assert_eq!(LedPattern::one_hot(3).bits(), 0b1000);
    }
}
