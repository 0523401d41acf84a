//! In-process request counters.
//!
//! Plain atomics, no external dependency — the same style this codebase
//! already used for its wire-protocol counters, scaled down to the handful
//! of counts this server actually needs. Not exposed over the wire; there
//! is no metrics endpoint in scope.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of the counters at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Requests that produced a typed, successful reply.
    pub served: u64,
    /// Requests that produced a `BAD_REQUEST` reply.
    pub bad_requests: u64,
    /// Datagrams dropped for failing the shape check.
    pub malformed_dropped: u64,
    /// Reservations reclaimed by the expiry sweeper.
    pub reservations_swept: u64,
}

/// Process-wide request counters.
#[derive(Debug, Default)]
pub struct Metrics {
    served: AtomicU64,
    bad_requests: AtomicU64,
    malformed_dropped: AtomicU64,
    reservations_swept: AtomicU64,
}

impl Metrics {
    /// Construct a fresh, zeroed set of counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request that produced a typed, successful reply.
    pub fn record_served(&self) {
        self.served.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request that produced a `BAD_REQUEST` reply.
    pub fn record_bad_request(&self) {
        self.bad_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a datagram dropped for failing the shape check.
    pub fn record_malformed_dropped(&self) {
        self.malformed_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record `count` reservations reclaimed by a sweep.
    pub fn record_reservations_swept(&self, count: u64) {
        if count > 0 {
            self.reservations_swept.fetch_add(count, Ordering::Relaxed);
        }
    }

    /// Read the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            served: self.served.load(Ordering::Relaxed),
            bad_requests: self.bad_requests.load(Ordering::Relaxed),
            malformed_dropped: self.malformed_dropped.load(Ordering::Relaxed),
            reservations_swept: self.reservations_swept.load(Ordering::Relaxed),
        }
    }
}
