//! Keyed throttle and debounce rate limiting
//!
//! Timers are deadlines against an injected [`Clock`] rather than real OS
//! timers. The owning event loop calls [`UpdateScheduler::run_due`] once per
//! turn; that is the only place deferred actions execute. Keys are independent
//! channels: a call on one key never affects another.

use crate::core::MAX_DELAY_MS;
use log::trace;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source for the scheduler
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall-clock backed by [`Instant`]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Simulated clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Deferred action run against the scheduler's context type
pub type DeferredAction<T> = Box<dyn FnOnce(&mut T)>;

struct PendingTimer<T> {
    deadline: Duration,
    /// `None` for a throttle cool-down, `Some` for a debounced action
    action: Option<DeferredAction<T>>,
}

/// Counters describing scheduler activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub throttled_runs: u64,
    pub throttled_drops: u64,
    pub debounce_restarts: u64,
    pub deferred_runs: u64,
    pub cancelled: u64,
}

/// Throttle/debounce table keyed by channel name.
///
/// `T` is the context handed to debounced actions when they fire.
pub struct UpdateScheduler<T> {
    clock: Box<dyn Clock>,
    timers: HashMap<String, PendingTimer<T>>,
    stats: SchedulerStats,
}

impl<T> UpdateScheduler<T> {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            timers: HashMap::new(),
            stats: SchedulerStats::default(),
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Run `action` now unless `key` is cooling down, then start a cool-down
    /// of `delay`. Calls during the cool-down are dropped, not queued.
    pub fn throttle<R>(&mut self, key: &str, action: impl FnOnce() -> R, delay: Duration) -> Option<R> {
        let now = self.clock.now();
        let blocked = self
            .timers
            .get(key)
            .map_or(false, |timer| timer.action.is_some() || now < timer.deadline);

        if blocked {
            self.stats.throttled_drops += 1;
            trace!("Throttled call on '{}' dropped", key);
            return None;
        }

        let result = action();
        self.timers.insert(
            key.to_string(),
            PendingTimer {
                deadline: now + delay,
                action: None,
            },
        );
        self.stats.throttled_runs += 1;
        Some(result)
    }

    /// Schedule `action` to run once `key` has been quiet for `delay`.
    /// A pending action on the same key is cancelled and replaced.
    pub fn debounce(&mut self, key: &str, action: impl FnOnce(&mut T) + 'static, delay: Duration) {
        let deadline = self.clock.now() + delay;
        let previous = self.timers.insert(
            key.to_string(),
            PendingTimer {
                deadline,
                action: Some(Box::new(action)),
            },
        );

        if previous.map_or(false, |timer| timer.action.is_some()) {
            self.stats.debounce_restarts += 1;
            trace!("Debounce on '{}' restarted", key);
        }
    }

    /// Expire cool-downs and execute debounced actions whose deadline has
    /// passed, in deadline order. Returns the number of actions executed.
    pub fn run_due(&mut self, context: &mut T) -> usize {
        let now = self.clock.now();
        let mut due: Vec<(Duration, String)> = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .map(|(key, timer)| (timer.deadline, key.clone()))
            .collect();
        due.sort();

        let mut executed = 0;
        for (_, key) in due {
            if let Some(PendingTimer { action: Some(action), .. }) = self.timers.remove(&key) {
                trace!("Running debounced action on '{}'", key);
                action(context);
                executed += 1;
            }
        }

        self.stats.deferred_runs += executed as u64;
        executed
    }

    /// Drop every pending cool-down and deferred action
    pub fn cancel_all(&mut self) {
        let cancelled = self.timers.len();
        self.timers.clear();
        self.stats.cancelled += cancelled as u64;
        if cancelled > 0 {
            trace!("Cancelled {} pending timers", cancelled);
        }
    }

    /// Earliest pending deadline, for an event loop deciding when to wake
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|timer| timer.deadline).min()
    }

    /// Whether `key` has a live timer (cool-down or pending action)
    pub fn is_pending(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.timers
            .get(key)
            .map_or(false, |timer| timer.action.is_some() || now < timer.deadline)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

/// Convert a fractional millisecond delay, clamped to [0, `MAX_DELAY_MS`].
/// NaN maps to zero.
pub fn delay_from_ms(ms: f64) -> Duration {
    let ms = if ms.is_nan() { 0.0 } else { ms.clamp(0.0, MAX_DELAY_MS) };
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
}
