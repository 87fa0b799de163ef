//! Stale-response guard for in-flight requests.
//!
//! A view that fires asynchronous requests (search-as-you-filter, an
//! investment submit) must not apply a response that resolves after the
//! user has already moved on — a slow page-1 response must not clobber the
//! page-2 results, and a response for a closed view must be discarded.
//!
//! [`RequestGeneration`] implements the generation-counter pattern: every
//! new request [`begin`](RequestGeneration::begin)s a generation,
//! invalidating all earlier tickets. When a response arrives, the caller
//! checks its ticket with [`is_current`](RequestGeneration::is_current) and
//! drops the response if a newer request superseded it.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generation counter owned by a view or request source.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    counter: AtomicU64,
}

/// Proof of which generation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request generation, invalidating all earlier tickets.
    pub fn begin(&self) -> Ticket {
        Ticket(self.counter.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether a response holding `ticket` is still the latest request and
    /// may be applied.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.counter.load(Ordering::Acquire) == ticket.0
    }

    /// Invalidate every outstanding ticket without starting a new request;
    /// called when the owning view goes away.
    pub fn cancel_all(&self) {
        self.counter.fetch_add(1, Ordering::AcqRel);
    }
}
