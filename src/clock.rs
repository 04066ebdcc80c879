use std::time::{Duration, Instant};

/// Most ticks [`Cadence::due`] reports for a single poll. Anything beyond
/// that after a stall is dropped.
pub const MAX_DUE: u32 = 8;

/// Fixed-interval trigger polled from the driver loop.
///
/// [`Cadence::poll`] fires at most once per poll and drops ticks missed
/// while the loop was busy. [`Cadence::due`] counts every tick that fell
/// between polls, so a cadence faster than the loop still keeps its rate.
#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    next: Instant,
}

impl Cadence {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self { interval, next: now }
    }

    /// `hz` must be non-zero (checked by config validation).
    pub fn from_hz(hz: u32, now: Instant) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1), now)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True when a tick is due at `now`; schedules the following one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        true
    }

    /// Number of ticks due at `now` (up to [`MAX_DUE`]); schedules the
    /// first tick after `now`.
    pub fn due(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }
        if self.interval.is_zero() {
            self.next = now;
            return 1;
        }
        let behind = (now - self.next).as_nanos() / self.interval.as_nanos() + 1;
        let n = u32::try_from(behind).unwrap_or(u32::MAX);
        if n > MAX_DUE {
            self.next = now + self.interval;
            return MAX_DUE;
        }
        self.next += self.interval * n;
        n
    }
}

/// Counts frames and reports the rate once per second.
#[derive(Debug)]
pub struct FpsCounter {
    frames: u32,
    since: Instant,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self { frames: 0, since: now }
    }

    /// Record a frame; returns the frame count of the last full second
    /// when one has elapsed.
    pub fn frame(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.duration_since(self.since) >= Duration::from_secs(1) {
            let fps = self.frames;
            self.frames = 0;
            self.since = now;
            Some(fps)
        } else {
            None
        }
    }
}
