//! One-shot retry timer
//!
//! At most one deadline is outstanding. Arming again replaces it, which is
//! the only way a pending retry gets cancelled short of [`RetryTimer::cancel`].

/// Fixed-delay one-shot timer over a wrapping millisecond clock
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryTimer {
    delay_ms: u32,
    armed_at_ms: Option<u32>,
}

impl RetryTimer {
    /// Create a disarmed timer
    pub const fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            armed_at_ms: None,
        }
    }

    /// Retry delay
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Arm the timer to fire `delay_ms` after `now_ms`
    ///
    /// Returns true if an outstanding deadline was replaced.
    pub fn arm(&mut self, now_ms: u32) -> bool {
        self.armed_at_ms.replace(now_ms).is_some()
    }

    /// Disarm the timer
    ///
    /// Returns true if a deadline was outstanding.
    pub fn cancel(&mut self) -> bool {
        self.armed_at_ms.take().is_some()
    }

    /// Check if a deadline is outstanding
    pub fn is_pending(&self) -> bool {
        self.armed_at_ms.is_some()
    }

    /// Fire if the deadline has passed
    ///
    /// Returns true exactly once per arming.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        match self.armed_at_ms {
            Some(armed_at) if now_ms.wrapping_sub(armed_at) >= self.delay_ms => {
                self.armed_at_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Milliseconds until the timer fires, if armed
    pub fn remaining_ms(&self, now_ms: u32) -> Option<u32> {
        self.armed_at_ms
            .map(|armed_at| self.delay_ms.saturating_sub(now_ms.wrapping_sub(armed_at)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once() {
        let mut timer = RetryTimer::new(2000);
        timer.arm(100);
        assert!(!timer.poll(2099));
        assert!(timer.poll(2100));
        assert!(!timer.poll(5000));
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let mut timer = RetryTimer::new(2000);
        assert!(!timer.arm(0));
        assert!(timer.arm(1500));
        // Original deadline (2000) no longer fires
        assert!(!timer.poll(2000));
        assert!(timer.poll(3500));
        assert!(!timer.poll(3600));
    }

    #[test]
    fn test_cancel() {
        let mut timer = RetryTimer::new(10);
        assert!(!timer.cancel());
        timer.arm(0);
        assert!(timer.cancel());
        assert!(!timer.poll(100));
    }

    #[test]
    fn test_remaining() {
        let mut timer = RetryTimer::new(2000);
        assert_eq!(timer.remaining_ms(0), None);
        timer.arm(u32::MAX - 499);
        assert_eq!(timer.remaining_ms(500), Some(1000));
        assert_eq!(timer.remaining_ms(5000), Some(0));
    }
}
