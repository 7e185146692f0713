//! Fixed-interval frame tick
//!
//! Polled, not interrupt driven. A tick fires on the first poll at or past
//! the interval and restarts the interval from that poll, so the effective
//! period is never shorter than the interval and drift accumulates.

/// Default frame interval in milliseconds
pub const DEFAULT_FRAME_INTERVAL_MS: u32 = 80;

/// Polling frame scheduler over a wrapping millisecond clock
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameScheduler {
    /// Minimum time between frames
    interval_ms: u32,
    /// Time of the last frame
    last_tick_ms: u32,
    /// Frames fired so far
    frames: u32,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL_MS)
    }
}

impl FrameScheduler {
    /// Create a scheduler whose clock starts at 0
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_tick_ms: 0,
            frames: 0,
        }
    }

    /// Frame interval
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Time of the last frame
    pub fn last_tick_ms(&self) -> u32 {
        self.last_tick_ms
    }

    /// Frames fired so far
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Poll the scheduler
    ///
    /// Returns true when a frame is due; the interval then restarts at `now_ms`.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_tick_ms) >= self.interval_ms {
            self.last_tick_ms = now_ms;
            self.frames = self.frames.wrapping_add(1);
            true
        } else {
            false
        }
    }

    /// Milliseconds until the next frame is due (0 if already due)
    pub fn time_until_due(&self, now_ms: u32) -> u32 {
        self.interval_ms
            .saturating_sub(now_ms.wrapping_sub(self.last_tick_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_frame_before_interval() {
        let mut scheduler = FrameScheduler::new(80);
        for now in [0, 10, 40, 79] {
            assert!(!scheduler.tick(now));
        }
        assert_eq!(scheduler.frames(), 0);
    }

    #[test]
    fn test_fires_once_at_interval() {
        let mut scheduler = FrameScheduler::new(80);
        assert!(scheduler.tick(80));
        assert_eq!(scheduler.last_tick_ms(), 80);
        assert!(!scheduler.tick(80));
        assert!(!scheduler.tick(159));
        assert_eq!(scheduler.frames(), 1);
    }

    #[test]
    fn test_late_poll_resets_from_now() {
        let mut scheduler = FrameScheduler::new(80);
        // Polled late: the next frame is measured from 130, not from 80
        assert!(scheduler.tick(130));
        assert!(!scheduler.tick(160));
        assert!(!scheduler.tick(209));
        assert!(scheduler.tick(210));
    }

    #[test]
    fn test_clock_wraparound() {
        let mut scheduler = FrameScheduler::new(80);
        assert!(scheduler.tick(u32::MAX - 10));
        assert!(!scheduler.tick(20));
        assert!(scheduler.tick(69));
    }

    #[test]
    fn test_time_until_due() {
        let mut scheduler = FrameScheduler::new(80);
        assert_eq!(scheduler.time_until_due(30), 50);
        assert_eq!(scheduler.time_until_due(200), 0);
        scheduler.tick(200);
        assert_eq!(scheduler.time_until_due(200), 80);
    }
}
