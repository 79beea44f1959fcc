//! Leading + trailing throttle decision logic, independent of any timer API.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrottleDecision {
    /// Run the callback immediately.
    Fire,
    /// Schedule one trailing run after `delay_ms`.
    ScheduleTrailing { delay_ms: f64 },
    /// A trailing run is already pending; drop this call.
    Coalesced,
}

/// Rate limiter that fires at most once per interval, with one trailing call for the last
/// suppressed burst.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleGate {
    interval_ms: f64,
    last_fired_ms: Option<f64>,
    trailing_pending: bool,
}

impl ThrottleGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: interval.as_millis() as f64,
            last_fired_ms: None,
            trailing_pending: false,
        }
    }

    pub fn call(&mut self, now_ms: f64) -> ThrottleDecision {
        let elapsed = self.last_fired_ms.map(|last| now_ms - last);
        match elapsed {
            Some(elapsed) if elapsed >= 0.0 && elapsed < self.interval_ms => {
                if self.trailing_pending {
                    ThrottleDecision::Coalesced
                } else {
                    self.trailing_pending = true;
                    ThrottleDecision::ScheduleTrailing {
                        delay_ms: self.interval_ms - elapsed,
                    }
                }
            }
            _ => {
                self.last_fired_ms = Some(now_ms);
                ThrottleDecision::Fire
            }
        }
    }

    /// Marks the scheduled trailing run as done; returns whether it should still fire.
    pub fn trailing_elapsed(&mut self, now_ms: f64) -> bool {
        if !self.trailing_pending {
            return false;
        }
        self.trailing_pending = false;
        self.last_fired_ms = Some(now_ms);
        true
    }

    pub fn cancel(&mut self) {
        self.trailing_pending = false;
    }

    pub fn has_pending_trailing(&self) -> bool {
        self.trailing_pending
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn first_call_fires_then_burst_collapses_into_one_trailing() {
        let mut gate = ThrottleGate::new(Duration::from_millis(50));

        assert_eq!(gate.call(0.0), ThrottleDecision::Fire);
        assert_eq!(
            gate.call(10.0),
            ThrottleDecision::ScheduleTrailing { delay_ms: 40.0 }
        );
        assert_eq!(gate.call(20.0), ThrottleDecision::Coalesced);
        assert_eq!(gate.call(49.0), ThrottleDecision::Coalesced);

        assert!(gate.trailing_elapsed(50.0));
        assert!(!gate.has_pending_trailing());
        assert_eq!(
            gate.call(60.0),
            ThrottleDecision::ScheduleTrailing { delay_ms: 40.0 }
        );
    }

    #[test]
    fn calls_spaced_past_interval_fire_directly() {
        let mut gate = ThrottleGate::new(Duration::from_millis(100));

        assert_eq!(gate.call(0.0), ThrottleDecision::Fire);
        assert_eq!(gate.call(100.0), ThrottleDecision::Fire);
        assert_eq!(gate.call(250.0), ThrottleDecision::Fire);
    }

    #[test]
    fn cancelled_trailing_does_not_fire() {
        let mut gate = ThrottleGate::new(Duration::from_millis(50));
        gate.call(0.0);
        gate.call(5.0);

        gate.cancel();

        assert!(!gate.trailing_elapsed(50.0));
    }

    #[test]
    fn clock_going_backwards_fires_instead_of_stalling() {
        let mut gate = ThrottleGate::new(Duration::from_millis(50));
        gate.call(1_000.0);

        assert_eq!(gate.call(900.0), ThrottleDecision::Fire);
    }
}
