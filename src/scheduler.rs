// =============================================================================
// Refresh Scheduler — periodic single-flight snapshot refresh
// =============================================================================
//
// Runs as a background Tokio task:
//   1. Refresh immediately on start.
//   2. Wait one period, refresh again, repeat until the cancellation token
//      fires.
//
// States: IDLE -> REFRESHING on a timer tick or an explicit `trigger()`;
// REFRESHING -> IDLE when the refresh returns, fails or panics. A trigger
// that arrives while a refresh is in flight is dropped, not queued.
//
// The guard is an `AtomicBool` claimed with compare-exchange and released by
// a drop guard owned by the refresh itself, so it is cleared on every exit
// path and holds under true parallelism.
//
// The refresh body runs on the blocking pool. Readers of the published
// snapshot never wait on it, and cancelling the loop merely stops waiting:
// an in-flight refresh either publishes a complete snapshot or nothing.
//
// Typical wiring:
//
//   let token = CancellationToken::new();
//   let handle = RefreshScheduler::new(aggregator, period).start(token.clone());
//   ...
//   token.cancel();
//   handle.await?;
//
// =============================================================================

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Shortest accepted refresh period.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A unit of work the scheduler refreshes periodically.
///
/// Implementations must publish atomically: either the whole new state
/// becomes visible or none of it does.
pub trait RefreshSource: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn refresh(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchedulerState {
    Idle,
    Refreshing,
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Refreshing => write!(f, "Refreshing"),
        }
    }
}

/// What happened to one refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed,
    Failed,
    /// Another refresh was already in flight.
    Skipped,
}

/// Serialisable view of the scheduler's counters.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub source: String,
    pub state: SchedulerState,
    pub period_ms: u64,
    pub completed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub last_error: Option<String>,
    pub last_success_at: Option<DateTime<Utc>>,
}

struct Inner {
    source: Arc<dyn RefreshSource>,
    period: Duration,
    in_flight: AtomicBool,
    completed: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
    last_error: RwLock<Option<String>>,
    last_success_at: RwLock<Option<DateTime<Utc>>>,
}

impl Inner {
    /// Run the source once and record the result. Never propagates errors.
    fn run_once(&self) -> RefreshOutcome {
        debug!(source = self.source.name(), "refresh started");
        match self.source.refresh() {
            Ok(()) => {
                self.completed.fetch_add(1, Ordering::SeqCst);
                *self.last_success_at.write() = Some(Utc::now());
                *self.last_error.write() = None;
                debug!(source = self.source.name(), "refresh completed");
                RefreshOutcome::Completed
            }
            Err(e) => {
                self.record_failure(format!("{e:#}"));
                RefreshOutcome::Failed
            }
        }
    }

    fn record_failure(&self, message: String) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        error!(
            source = self.source.name(),
            error = %message,
            "refresh failed; previous snapshot retained"
        );
        *self.last_error.write() = Some(message);
    }
}

/// Releases the single-flight flag when dropped.
struct InFlightGuard {
    inner: Arc<Inner>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.in_flight.store(false, Ordering::Release);
    }
}

/// Drives periodic refreshes of one [`RefreshSource`]. Cheap to clone; all
/// clones share the same guard and counters.
#[derive(Clone)]
pub struct RefreshScheduler {
    inner: Arc<Inner>,
}

impl RefreshScheduler {
    /// `period` is clamped to at least [`MIN_PERIOD`].
    pub fn new(source: Arc<dyn RefreshSource>, period: Duration) -> Self {
        if period < MIN_PERIOD {
            warn!(
                source = source.name(),
                requested_ms = period.as_millis() as u64,
                "refresh period below minimum, clamping"
            );
        }
        let period = period.max(MIN_PERIOD);
        Self {
            inner: Arc::new(Inner {
                source,
                period,
                in_flight: AtomicBool::new(false),
                completed: AtomicU64::new(0),
                failed: AtomicU64::new(0),
                skipped: AtomicU64::new(0),
                last_error: RwLock::new(None),
                last_success_at: RwLock::new(None),
            }),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.inner.in_flight.load(Ordering::Acquire) {
            SchedulerState::Refreshing
        } else {
            SchedulerState::Idle
        }
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            source: self.inner.source.name().to_string(),
            state: self.state(),
            period_ms: self.inner.period.as_millis() as u64,
            completed: self.inner.completed.load(Ordering::SeqCst),
            failed: self.inner.failed.load(Ordering::SeqCst),
            skipped: self.inner.skipped.load(Ordering::SeqCst),
            last_error: self.inner.last_error.read().clone(),
            last_success_at: *self.inner.last_success_at.read(),
        }
    }

    /// Request one refresh now.
    ///
    /// Returns [`RefreshOutcome::Skipped`] immediately if a refresh is
    /// already in flight. Dropping the returned future does not abort a
    /// refresh that has started; it runs to completion in the background.
    pub async fn trigger(&self) -> RefreshOutcome {
        if self
            .inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.inner.skipped.fetch_add(1, Ordering::SeqCst);
            debug!(source = self.inner.source.name(), "refresh already in flight; request dropped");
            return RefreshOutcome::Skipped;
        }

        let guard = InFlightGuard {
            inner: Arc::clone(&self.inner),
        };
        let inner = Arc::clone(&self.inner);
        let handle = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            inner.run_once()
        });

        match handle.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                self.inner.record_failure(format!("refresh task aborted: {join_err}"));
                RefreshOutcome::Failed
            }
        }
    }

    /// Run the refresh loop until `token` is cancelled.
    pub async fn run(&self, token: CancellationToken) {
        info!(
            source = self.inner.source.name(),
            period_ms = self.inner.period.as_millis() as u64,
            "refresh scheduler started"
        );

        let mut ticker = interval(self.inner.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    warn!(
                        source = self.inner.source.name(),
                        "cancelled while refreshing; in-flight refresh left to finish"
                    );
                    break;
                }
                outcome = self.trigger() => {
                    if outcome == RefreshOutcome::Skipped {
                        debug!(source = self.inner.source.name(), "tick skipped: refresh in flight");
                    }
                }
            }
        }

        info!(source = self.inner.source.name(), "refresh scheduler stopped");
    }

    /// Spawn [`run`](Self::run) as a background task.
    pub fn start(&self, token: CancellationToken) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.run(token).await })
    }
}
