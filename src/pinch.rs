// src/pinch.rs - Pinch detection with hysteresis
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::PinchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PinchState {
    #[default]
    Released,
    Pinched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchTransition {
    /// Fingers closed: drawing begins.
    Down,
    /// Fingers opened: the stroke is complete.
    Up,
}

/// Two thresholds keep the state from chattering while the fingertips hover
/// near a single boundary: a pinch starts below `start_threshold` and only
/// ends above `release_threshold`.
#[derive(Debug, Clone)]
pub struct PinchDetector {
    state: PinchState,
    start_threshold: f64,
    release_threshold: f64,
}

impl PinchDetector {
    pub fn new(config: &PinchConfig) -> Self {
        Self {
            state: PinchState::Released,
            start_threshold: config.start_threshold,
            release_threshold: config.release_threshold,
        }
    }

    pub fn state(&self) -> PinchState {
        self.state
    }

    pub fn is_pinched(&self) -> bool {
        self.state == PinchState::Pinched
    }

    /// Feeds one thumb/index distance sample.
    pub fn update(&mut self, distance: f64) -> Option<PinchTransition> {
        trace!(distance, state = ?self.state, "pinch sample");

        match self.state {
            PinchState::Released if distance < self.start_threshold => {
                self.state = PinchState::Pinched;
                Some(PinchTransition::Down)
            }
            PinchState::Pinched if distance > self.release_threshold => {
                self.state = PinchState::Released;
                Some(PinchTransition::Up)
            }
            _ => None,
        }
    }

    /// Drops back to released without a sample, e.g. when the hand is lost.
    /// Returns true if a pinch was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_pinched = self.is_pinched();
        self.state = PinchState::Released;
        was_pinched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> PinchDetector {
        PinchDetector::new(&PinchConfig {
            start_threshold: 0.06,
            release_threshold: 0.12,
        })
    }

    #[test]
    fn sample_inside_band_does_not_release() {
        let mut pinch = detector();
        let mut trace = vec![pinch.state()];
        for d in [0.05, 0.05, 0.08, 0.05] {
            pinch.update(d);
            trace.push(pinch.state());
        }

        assert_eq!(
            trace,
            vec![
                PinchState::Released,
                PinchState::Pinched,
                PinchState::Pinched,
                PinchState::Pinched,
                PinchState::Pinched,
            ]
        );
    }

    #[test]
    fn oscillation_between_thresholds_toggles_once() {
        let mut pinch = detector();
        let samples = [
            0.07, 0.11, 0.07, 0.11, // hovering while released
            0.05, // closes
            0.07, 0.11, 0.07, 0.11, 0.10, // hovering while pinched
        ];

        let transitions: Vec<_> = samples.iter().filter_map(|d| pinch.update(*d)).collect();
        assert_eq!(transitions, vec![PinchTransition::Down]);
        assert!(pinch.is_pinched());
    }

    #[test]
    fn release_requires_crossing_upper_threshold() {
        let mut pinch = detector();
        assert_eq!(pinch.update(0.03), Some(PinchTransition::Down));
        assert_eq!(pinch.update(0.12), None);
        assert_eq!(pinch.update(0.13), Some(PinchTransition::Up));
        assert_eq!(pinch.state(), PinchState::Released);
        // Boundary value on the way down does not start a pinch.
        assert_eq!(pinch.update(0.06), None);
    }

    #[test]
    fn cancel_reports_whether_a_pinch_was_active() {
        let mut pinch = detector();
        assert!(!pinch.cancel());
        pinch.update(0.01);
        assert!(pinch.cancel());
        assert_eq!(pinch.state(), PinchState::Released);
    }

    #[test]
    fn nan_distance_keeps_state() {
        let mut pinch = detector();
        assert_eq!(pinch.update(f64::NAN), None);
        pinch.update(0.01);
        assert_eq!(pinch.update(f64::NAN), None);
        assert!(pinch.is_pinched());
    }
}
