//! Cancellable one-shot timers polled against a caller-supplied clock.
//!
//! Nothing here sleeps or spawns; the owner drives time by calling `poll`
//! from its own loop. Every (re)start bumps a generation counter so a token
//! handed out earlier can be recognized as superseded.

use std::time::{Duration, Instant};

/// Identifies one scheduling of a [`CancellableTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone)]
pub struct CancellableTimer {
    delay: Duration,
    deadline: Option<Instant>,
    generation: u64,
}

impl CancellableTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            generation: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule the timer to fire `delay` after `now`, superseding any
    /// pending schedule.
    pub fn start(&mut self, now: Instant) -> TimerToken {
        self.start_with(now, self.delay)
    }

    /// Schedule with a one-off delay.
    pub fn start_with(&mut self, now: Instant, delay: Duration) -> TimerToken {
        self.generation += 1;
        self.deadline = Some(now + delay);
        TimerToken(self.generation)
    }

    /// Alias of [`start`](Self::start); reads better at debounce call sites.
    pub fn reset(&mut self, now: Instant) -> TimerToken {
        self.start(now)
    }

    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            self.generation += 1;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether `token` belongs to the latest schedule.
    pub fn is_current(&self, token: TimerToken) -> bool {
        token.0 == self.generation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once when the deadline has been reached.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Runs only the last trigger of a burst.
#[derive(Debug, Clone)]
pub struct Debouncer {
    timer: CancellableTimer,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            timer: CancellableTimer::new(delay),
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.timer.reset(now);
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// `true` once the burst has been quiet for the full delay.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.timer.poll(now)
    }
}
