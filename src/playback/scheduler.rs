//! Timer scheduling
//!
//! The engine only needs "call me every N" and "stop calling me". Production
//! sessions use `TokioScheduler`; tests drive `ManualScheduler`, a virtual
//! clock that fires due callbacks when advanced.
//!
//! ## Architecture
//! ```text
//! Session --schedule_repeating--> Scheduler --callback(every interval)--> Session
//! Session --cancel(TimerId)-----> Scheduler
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shortest interval a timer may run at
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Counter for generating unique timer ids
static TIMER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one scheduled repeating timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    fn next() -> Self {
        Self(TIMER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Callback invoked on every timer tick with the id of the firing timer
pub type TickCallback = Arc<dyn Fn(TimerId) + Send + Sync>;

/// Repeating timer capability
pub trait Scheduler: Send + Sync {
    /// Call `callback` every `interval`, first call one interval from now
    fn schedule_repeating(&self, interval: Duration, callback: TickCallback) -> TimerId;

    /// Stop a timer; unknown or already cancelled ids are ignored
    fn cancel(&self, id: TimerId);
}

// ============ Tokio ============

/// Scheduler backed by tokio tasks and intervals
///
/// Missed ticks are skipped rather than replayed in a burst.
pub struct TokioScheduler {
    handle: Handle,
    tasks: Mutex<HashMap<TimerId, JoinHandle<()>>>,
}

impl std::fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("timers", &self.tasks.lock().len())
            .finish()
    }
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Scheduler on the runtime the caller is running in
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().context("TokioScheduler requires a tokio runtime")?;
        Ok(Self::new(handle))
    }

    pub fn active_timers(&self) -> usize {
        self.tasks.lock().len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, interval: Duration, callback: TickCallback) -> TimerId {
        let id = TimerId::next();
        let period = interval.max(MIN_INTERVAL);

        let task = self.handle.spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                callback(id);
            }
        });

        self.tasks.lock().insert(id, task);
        tracing::debug!("Scheduled {} every {:?}", id, period);
        id
    }

    fn cancel(&self, id: TimerId) {
        if let Some(task) = self.tasks.lock().remove(&id) {
            task.abort();
            tracing::debug!("Cancelled {}", id);
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.lock().drain() {
            task.abort();
        }
    }
}

// ============ Manual ============

struct ManualTimer {
    interval: Duration,
    next_due: Duration,
    callback: TickCallback,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    timers: BTreeMap<TimerId, ManualTimer>,
}

/// Virtual clock scheduler
///
/// Nothing fires until `advance` is called. Callbacks run on the caller's
/// thread without the scheduler lock held, so they may schedule or cancel
/// timers themselves.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("timers", &state.timers.len())
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time since creation
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    pub fn active_timers(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Move virtual time forward, firing every tick that falls due in order
    pub fn advance(&self, by: Duration) {
        let target = self.state.lock().now + by;

        loop {
            let (id, callback) = {
                let mut state = self.state.lock();
                let due = state
                    .timers
                    .iter()
                    .filter(|(_, timer)| timer.next_due <= target)
                    .min_by_key(|(id, timer)| (timer.next_due, **id))
                    .map(|(id, _)| *id);

                let Some(id) = due else {
                    state.now = target;
                    break;
                };

                let Some(timer) = state.timers.get_mut(&id) else {
                    break;
                };
                let fired_at = timer.next_due;
                timer.next_due += timer.interval;
                let callback = timer.callback.clone();
                state.now = fired_at;
                (id, callback)
            };

            callback(id);
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, interval: Duration, callback: TickCallback) -> TimerId {
        let id = TimerId::next();
        let interval = interval.max(MIN_INTERVAL);
        let mut state = self.state.lock();
        let next_due = state.now + interval;
        state.timers.insert(
            id,
            ManualTimer {
                interval,
                next_due,
                callback,
            },
        );
        id
    }

    fn cancel(&self, id: TimerId) {
        self.state.lock().timers.remove(&id);
    }
}
