//! Request gate: fail-fast mutual exclusion plus readiness pacing
//!
//! The gate limits in-flight mutating operations to one. A second acquisition
//! attempt while an operation is outstanding fails immediately rather than
//! queuing: the remote service penalizes rapid duplicate submissions more than
//! a single rejected click, so losers must abandon the whole operation.
//!
//! Readiness is a separate concern layered on the same type: after acquiring
//! the gate, the pipeline suspends on an externally injected
//! [`ReadinessSource`] before dispatching the network call. This throttles
//! automated action rates to a human-plausible cadence.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

/// Source of the "ready to dispatch" signal the pipeline waits on before
/// issuing a network call.
///
/// Injected at gate construction as a capability; the wait is unbounded and
/// callers needing a timeout must wrap it themselves.
#[async_trait]
pub trait ReadinessSource: Send + Sync + std::fmt::Debug {
    /// Suspend until the next dispatch is allowed.
    async fn wait_ready(&self);
}

/// Readiness source that never suspends.
///
/// Default for library embedders that pace requests themselves.
#[derive(Debug, Default)]
pub struct ImmediateReadiness;

#[async_trait]
impl ReadinessSource for ImmediateReadiness {
    async fn wait_ready(&self) {}
}

/// Readiness source enforcing a minimum interval between dispatches.
#[derive(Debug)]
pub struct PacedReadiness {
    /// Minimum gap between consecutive dispatches
    min_interval: Duration,
    /// Completion time of the previous wait
    last_dispatch: Mutex<Option<Instant>>,
}

impl PacedReadiness {
    /// Create a pacer with the given minimum interval between dispatches
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ReadinessSource for PacedReadiness {
    async fn wait_ready(&self) {
        let mut last = self.last_dispatch.lock().await;
        if let Some(prev) = *last {
            let due = prev + self.min_interval;
            let now = Instant::now();
            if due > now {
                tokio::time::sleep(due - now).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Readiness source fired explicitly from outside.
///
/// Each call to [`ManualReadiness::fire`] permits exactly one dispatch. Used
/// by tests to pin call ordering, and by embedders that gate dispatches on a
/// user gesture.
#[derive(Debug, Default)]
pub struct ManualReadiness {
    notify: Notify,
}

impl ManualReadiness {
    /// Create an unfired readiness source
    pub fn new() -> Self {
        Self::default()
    }

    /// Permit one pending or future `wait_ready` call to proceed
    pub fn fire(&self) {
        self.notify.notify_one();
    }
}

#[async_trait]
impl ReadinessSource for ManualReadiness {
    async fn wait_ready(&self) {
        self.notify.notified().await;
    }
}

/// Mutual-exclusion gate over mutating operations.
///
/// Holds the single "operation in flight" flag and the injected readiness
/// source. Created once per pipeline; the flag is mutated only through
/// [`RequestGate::try_acquire`] and guard drop.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use formgate::{ImmediateReadiness, RequestGate};
///
/// # tokio_test::block_on(async {
/// let gate = Arc::new(RequestGate::new(Arc::new(ImmediateReadiness)));
///
/// let guard = gate.try_acquire().expect("gate is free");
/// assert!(gate.try_acquire().is_none());
///
/// drop(guard);
/// assert!(!gate.is_in_flight());
/// # });
/// ```
#[derive(Debug)]
pub struct RequestGate {
    /// True while an operation holds the gate
    in_flight: AtomicBool,
    /// Observers woken on release
    released: Notify,
    /// Readiness capability consulted after acquisition
    readiness: Arc<dyn ReadinessSource>,
}

impl RequestGate {
    /// Create a gate with the given readiness source
    pub fn new(readiness: Arc<dyn ReadinessSource>) -> Self {
        Self {
            in_flight: AtomicBool::new(false),
            released: Notify::new(),
            readiness,
        }
    }

    /// Attempt to acquire the gate without blocking.
    ///
    /// Returns `None` immediately if an operation is already in flight. There
    /// is no queue: the caller must surface a simultaneity failure and abandon
    /// the operation. On success the returned guard releases the gate when
    /// dropped, so no exit path can leak it.
    pub fn try_acquire(self: &Arc<Self>) -> Option<GateGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard {
                gate: Arc::clone(self),
            })
    }

    /// Release the gate.
    ///
    /// Idempotent: error paths may call it after a prior path already did.
    pub fn release(&self) {
        self.in_flight.store(false, Ordering::Release);
        self.released.notify_waiters();
    }

    /// Suspend until the readiness source fires.
    ///
    /// Logically independent of the mutual-exclusion flag; always runs after
    /// acquisition succeeds and before the network call is issued.
    pub async fn wait_ready(&self) {
        self.readiness.wait_ready().await;
    }

    /// Whether an operation currently holds the gate
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Wait until the next release notification
    pub async fn released(&self) {
        self.released.notified().await;
    }
}

/// RAII handle to an acquired gate; releases on drop.
#[derive(Debug)]
pub struct GateGuard {
    gate: Arc<RequestGate>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.gate.release();
    }
}
