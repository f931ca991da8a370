//! Simulation-time timers
//!
//! A timer counts elapsed simulation milliseconds toward a delay. It has no
//! callback of its own: the owner polls [`Timer::advance`] and runs its own
//! handler when it fires. Cancelling disarms it, so a cancelled timer never
//! fires, even if it was already due this tick.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    delay_ms: f32,
    elapsed_ms: f32,
    armed: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the countdown with a fresh delay
    pub fn arm(&mut self, delay_ms: f32) {
        self.delay_ms = delay_ms.max(0.0);
        self.elapsed_ms = 0.0;
        self.armed = true;
    }

    pub fn cancel(&mut self) {
        self.armed = false;
        self.elapsed_ms = 0.0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    /// Fraction of the delay elapsed, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.delay_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.delay_ms).min(1.0)
        }
    }

    /// Advance by `delta_ms`. Returns true exactly once, when the delay is
    /// reached; the timer is then disarmed until re-armed.
    pub fn advance(&mut self, delta_ms: f32) -> bool {
        if !self.armed {
            return false;
        }
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= self.delay_ms {
            self.armed = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_at_delay() {
        let mut timer = Timer::new();
        timer.arm(100.0);
        assert!(!timer.advance(60.0));
        assert!((timer.progress() - 0.6).abs() < 1e-6);
        assert!(timer.advance(40.0));
        assert!(!timer.is_armed());
        assert!(!timer.advance(500.0));
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timer = Timer::new();
        timer.arm(10.0);
        timer.cancel();
        assert!(!timer.advance(1000.0));
    }

    #[test]
    fn test_rearm_resets_elapsed() {
        let mut timer = Timer::new();
        timer.arm(100.0);
        timer.advance(90.0);
        timer.arm(50.0);
        assert!(!timer.advance(40.0));
        assert!(timer.advance(10.0));
    }

    #[test]
    fn test_unarmed_does_nothing() {
        let mut timer = Timer::new();
        assert!(!timer.advance(1.0));
        assert!(!timer.is_armed());
    }
}
