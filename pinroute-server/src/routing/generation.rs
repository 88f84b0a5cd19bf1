//! Request generations for discarding stale results.
//!
//! Every request takes a [`Ticket`] when it starts. Only the holder of the
//! newest ticket may publish; anything that finishes after being
//! superseded is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

/// Token identifying one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic counter handing out tickets.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    current: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding all earlier tickets.
    pub fn next(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }
}

/// The most recent result, guarded by request generation.
#[derive(Debug)]
pub struct LatestResult<T> {
    generation: RequestGeneration,
    slot: RwLock<Option<(Ticket, T)>>,
}

impl<T: Clone> LatestResult<T> {
    pub fn new() -> Self {
        Self {
            generation: RequestGeneration::new(),
            slot: RwLock::new(None),
        }
    }

    /// Take a ticket for a new request.
    pub fn begin(&self) -> Ticket {
        self.generation.next()
    }

    /// Store `value` if `ticket` is still current.
    ///
    /// Returns whether the value was stored.
    pub async fn publish(&self, ticket: Ticket, value: T) -> bool {
        let mut slot = self.slot.write().await;
        if !self.generation.is_current(ticket) {
            tracing::debug!(ticket = ticket.value(), "discarding stale result");
            return false;
        }
        *slot = Some((ticket, value));
        true
    }

    /// The last published value, if any.
    pub async fn latest(&self) -> Option<T> {
        self.slot.read().await.as_ref().map(|(_, value)| value.clone())
    }

    /// Forget the published value and supersede in-flight requests.
    pub async fn clear(&self) {
        let mut slot = self.slot.write().await;
        self.generation.next();
        *slot = None;
    }
}

impl<T: Clone> Default for LatestResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes() {
        let generation = RequestGeneration::new();
        let first = generation.next();
        assert!(generation.is_current(first));

        let second = generation.next();
        assert!(second > first);
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[tokio::test]
    async fn stale_results_are_discarded() {
        let latest = LatestResult::new();
        let slow = latest.begin();
        let fast = latest.begin();

        assert!(latest.publish(fast, "fast").await);
        assert!(!latest.publish(slow, "slow").await);
        assert_eq!(latest.latest().await, Some("fast"));
    }

    #[tokio::test]
    async fn clear_supersedes_in_flight() {
        let latest = LatestResult::new();
        let ticket = latest.begin();
        latest.clear().await;

        assert!(!latest.publish(ticket, 1).await);
        assert_eq!(latest.latest().await, None);
    }
}
