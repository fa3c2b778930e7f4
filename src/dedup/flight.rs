//! Deduplication Cache Module
//!
//! Coalesces concurrent identical requests into a single upstream
//! computation and serves a time-bounded cached result for repeats.
//!
//! Admission is one mutex-guarded step: a caller either gets a fresh
//! cached result, a receiver attached to the running computation, or a
//! leader guard obligating it to run the computation itself. Holding the
//! check and the insert under one lock is what guarantees at most one
//! in-flight computation per fingerprint under arbitrary interleavings.
//!
//! The leader guard clears its slot on drop if the computation never
//! completed, so a cancelled or panicked leader cannot leave a
//! fingerprint permanently stuck.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::debug;

use crate::cache::current_timestamp_ms;
use crate::dedup::DedupStats;
use crate::error::{DigestError, Result};
use crate::models::Summary;

/// What the leader broadcasts to its followers.
pub type FlightResult = std::result::Result<Summary, String>;

// == Slot ==
/// State of one fingerprint in the table.
enum Slot {
    /// A computation is running; waiters receive its outcome
    InFlight {
        created_at: u64,
        waiters: Vec<oneshot::Sender<FlightResult>>,
    },
    /// A computation succeeded within the TTL window
    Resolved { summary: Summary, resolved_at: u64 },
}

struct DedupState {
    slots: HashMap<String, Slot>,
    stats: DedupStats,
}

struct DedupInner {
    state: Mutex<DedupState>,
    ttl_ms: u64,
}

// == Admission ==
/// Outcome of admitting a fingerprint.
pub enum Admission {
    /// A fresh resolved result was available
    Cached(Summary),
    /// A computation is already running; await its outcome
    Follower(oneshot::Receiver<FlightResult>),
    /// This caller must run the computation and complete the guard
    Leader(FlightGuard),
}

/// How a request was ultimately served.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupSource {
    /// A new upstream computation ran
    Fresh,
    /// Served from a resolved entry
    Cached,
    /// Attached to a computation another caller started
    Coalesced,
}

// == Dedup Cache ==
/// In-memory, non-durable deduplication table. Entries are a performance
/// optimization only and are rebuilt from scratch on restart.
#[derive(Clone)]
pub struct DedupCache {
    inner: Arc<DedupInner>,
}

impl DedupCache {
    // == Constructor ==
    /// Creates a cache whose resolved entries live for `ttl_ms`.
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            inner: Arc::new(DedupInner {
                state: Mutex::new(DedupState {
                    slots: HashMap::new(),
                    stats: DedupStats::default(),
                }),
                ttl_ms,
            }),
        }
    }

    // == Lookup Resolved ==
    /// Returns the cached result for `fingerprint` if it resolved within
    /// the TTL. A stale entry is evicted opportunistically.
    pub fn lookup_resolved(&self, fingerprint: &str) -> Option<Summary> {
        let now = current_timestamp_ms();
        let mut guard = self.inner.state.lock().expect("dedup state lock poisoned");
        let state = &mut *guard;

        match state.slots.get(fingerprint) {
            Some(Slot::Resolved {
                summary,
                resolved_at,
            }) if now.saturating_sub(*resolved_at) < self.inner.ttl_ms => {
                let summary = summary.clone();
                state.stats.hits += 1;
                Some(summary)
            }
            Some(Slot::Resolved { .. }) => {
                state.slots.remove(fingerprint);
                state.stats.expired += 1;
                None
            }
            _ => None,
        }
    }

    // == Admit ==
    /// Atomic insert-if-absent admission for `fingerprint`.
    ///
    /// Exactly one caller per fingerprint receives `Leader` at any
    /// instant; every other concurrent caller receives `Follower` until
    /// the leader completes or is dropped.
    pub fn admit(&self, fingerprint: &str) -> Admission {
        let now = current_timestamp_ms();
        let mut guard = self.inner.state.lock().expect("dedup state lock poisoned");
        let state = &mut *guard;

        if let Some(Slot::Resolved {
            summary,
            resolved_at,
        }) = state.slots.get(fingerprint)
        {
            if now.saturating_sub(*resolved_at) < self.inner.ttl_ms {
                let summary = summary.clone();
                state.stats.hits += 1;
                return Admission::Cached(summary);
            }
            // Stale: evict and fall through to leader registration
            state.slots.remove(fingerprint);
            state.stats.expired += 1;
        }

        if let Some(Slot::InFlight { waiters, .. }) = state.slots.get_mut(fingerprint) {
            let (tx, rx) = oneshot::channel();
            waiters.push(tx);
            state.stats.coalesced += 1;
            debug!("Coalescing request onto in-flight computation {}", fingerprint);
            return Admission::Follower(rx);
        }

        state.slots.insert(
            fingerprint.to_string(),
            Slot::InFlight {
                created_at: now,
                waiters: Vec::new(),
            },
        );
        state.stats.started += 1;
        Admission::Leader(FlightGuard {
            inner: Arc::clone(&self.inner),
            fingerprint: fingerprint.to_string(),
            completed: false,
        })
    }

    // == Get Or Compute ==
    /// Full deduplicated fetch: serve a cached result, join the running
    /// computation, or run `compute` as the leader and broadcast its
    /// outcome.
    ///
    /// Upstream failures propagate to every waiting caller and are never
    /// cached; the next request for the same fingerprint starts over.
    pub async fn get_or_compute<F, Fut>(
        &self,
        fingerprint: &str,
        compute: F,
    ) -> Result<(Summary, DedupSource)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Summary>>,
    {
        match self.admit(fingerprint) {
            Admission::Cached(summary) => Ok((summary, DedupSource::Cached)),
            Admission::Follower(rx) => match rx.await {
                Ok(Ok(summary)) => Ok((summary, DedupSource::Coalesced)),
                Ok(Err(message)) => Err(DigestError::Upstream(message)),
                Err(_) => Err(DigestError::Upstream(
                    "computation abandoned before completion".to_string(),
                )),
            },
            Admission::Leader(flight) => match compute().await {
                Ok(summary) => {
                    flight.complete(Ok(summary.clone()));
                    Ok((summary, DedupSource::Fresh))
                }
                Err(e) => {
                    let message = e.to_string();
                    flight.complete(Err(message.clone()));
                    Err(DigestError::Upstream(message))
                }
            },
        }
    }

    // == Sweep Expired ==
    /// Removes resolved entries older than the TTL. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let ttl_ms = self.inner.ttl_ms;
        let mut guard = self.inner.state.lock().expect("dedup state lock poisoned");
        let state = &mut *guard;

        let before = state.slots.len();
        state.slots.retain(|_, slot| match slot {
            Slot::InFlight { .. } => true,
            Slot::Resolved { resolved_at, .. } => now.saturating_sub(*resolved_at) < ttl_ms,
        });
        let removed = before - state.slots.len();
        state.stats.expired += removed as u64;

        let oldest_in_flight = state
            .slots
            .values()
            .filter_map(|slot| match slot {
                Slot::InFlight { created_at, .. } => Some(*created_at),
                _ => None,
            })
            .min();
        if let Some(created_at) = oldest_in_flight {
            debug!(
                "Dedup sweep: oldest in-flight computation is {}ms old",
                now.saturating_sub(created_at)
            );
        }

        removed
    }

    // == Clear ==
    /// Drops every entry. Waiters on in-flight slots observe abandonment.
    pub fn clear(&self) {
        let mut guard = self.inner.state.lock().expect("dedup state lock poisoned");
        guard.slots.clear();
    }

    // == Stats ==
    /// Snapshot of counters plus live gauges.
    pub fn stats(&self) -> DedupStats {
        let guard = self.inner.state.lock().expect("dedup state lock poisoned");
        let mut stats = guard.stats.clone();
        stats.in_flight = guard
            .slots
            .values()
            .filter(|slot| matches!(slot, Slot::InFlight { .. }))
            .count();
        stats.resolved = guard.slots.len() - stats.in_flight;
        stats
    }

    // == Length ==
    /// Total entries (in-flight plus resolved).
    pub fn len(&self) -> usize {
        self.inner
            .state
            .lock()
            .expect("dedup state lock poisoned")
            .slots
            .len()
    }

    /// Returns true if the table is empty.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Flight Guard ==
/// Obligation handle held by the leader of one in-flight computation.
///
/// Exactly one guard exists per in-flight fingerprint. If it is dropped
/// without `complete`, the slot is cleared and waiters are notified by
/// their senders dropping.
pub struct FlightGuard {
    inner: Arc<DedupInner>,
    fingerprint: String,
    completed: bool,
}

impl FlightGuard {
    /// Finishes the computation: removes the in-flight slot, broadcasts
    /// the outcome to every waiter, and on success stores a resolved
    /// entry in its place.
    pub fn complete(mut self, result: FlightResult) {
        self.completed = true;
        let now = current_timestamp_ms();
        let mut guard = self.inner.state.lock().expect("dedup state lock poisoned");
        let state = &mut *guard;

        if let Some(Slot::InFlight { waiters, .. }) = state.slots.remove(&self.fingerprint) {
            for waiter in waiters {
                let _ = waiter.send(result.clone());
            }
        }

        if let Ok(summary) = result {
            state.slots.insert(
                self.fingerprint.clone(),
                Slot::Resolved {
                    summary,
                    resolved_at: now,
                },
            );
        }
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        // Leader died without completing: clear the slot so the
        // fingerprint stays retryable. Dropping the waiters' senders
        // signals abandonment to every follower.
        if let Ok(mut guard) = self.inner.state.lock() {
            if matches!(
                guard.slots.get(&self.fingerprint),
                Some(Slot::InFlight { .. })
            ) {
                guard.slots.remove(&self.fingerprint);
            }
        }
    }
}
