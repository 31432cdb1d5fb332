//! Concurrency limiter
//!
//! A counting admission gate that bounds how many units of work run at the
//! same time. Built on `tokio::sync::Semaphore` with owned permits so a slot
//! guard can move into a spawned task; dropping the guard returns the slot,
//! whether the unit succeeded, failed or panicked.
//!
//! The limiter also keeps two counters, the current number of held slots and
//! the highest number ever held at once. The dispatcher does not need them;
//! they exist so runs can be observed and the cap asserted in tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::types::SettlementError;

/// Bounded admission gate shared by every unit of one run
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    limit: usize,
    semaphore: Arc<Semaphore>,
    gauge: Arc<Gauge>,
}

#[derive(Debug, Default)]
struct Gauge {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// A held limiter slot; the slot is released when this is dropped
#[derive(Debug)]
pub struct SlotGuard {
    _permit: OwnedSemaphorePermit,
    gauge: Arc<Gauge>,
}

impl ConcurrencyLimiter {
    /// Create a limiter admitting at most `limit` units at once
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::InvalidConcurrencyLimit` if `limit` is zero.
    pub fn new(limit: usize) -> Result<Self, SettlementError> {
        if limit == 0 {
            return Err(SettlementError::invalid_concurrency_limit(limit));
        }

        Ok(Self {
            limit,
            semaphore: Arc::new(Semaphore::new(limit)),
            gauge: Arc::new(Gauge::default()),
        })
    }

    /// Wait for a free slot
    ///
    /// No fairness is promised to callers beyond what the semaphore provides.
    pub async fn acquire(&self) -> SlotGuard {
        let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
            Ok(permit) => permit,
            // The semaphore is owned by this limiter and never closed.
            Err(_) => unreachable!("limiter semaphore closed"),
        };

        let now = self.gauge.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.gauge.peak.fetch_max(now, Ordering::SeqCst);

        SlotGuard {
            _permit: permit,
            gauge: Arc::clone(&self.gauge),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of slots currently held
    pub fn in_flight(&self) -> usize {
        self.gauge.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of slots held simultaneously since creation
    pub fn peak_in_flight(&self) -> usize {
        self.gauge.peak.load(Ordering::SeqCst)
    }

    /// Slots free right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        // Runs before the permit field is dropped, so the gauge never reads
        // higher than the number of permits actually out.
        self.gauge.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_zero_limit_is_rejected() {
        let result = ConcurrencyLimiter::new(0);

        assert!(matches!(
            result,
            Err(SettlementError::InvalidConcurrencyLimit { limit: 0 })
        ));
    }

    #[tokio::test]
    async fn test_acquire_and_release() {
        let limiter = ConcurrencyLimiter::new(2).unwrap();

        let first = limiter.acquire().await;
        let second = limiter.acquire().await;
        assert_eq!(limiter.in_flight(), 2);
        assert_eq!(limiter.available(), 0);

        drop(first);
        assert_eq!(limiter.in_flight(), 1);
        assert_eq!(limiter.available(), 1);

        drop(second);
        assert_eq!(limiter.in_flight(), 0);
        assert_eq!(limiter.peak_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_acquire_blocks_when_full() {
        let limiter = ConcurrencyLimiter::new(1).unwrap();
        let held = limiter.acquire().await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), limiter.acquire()).await;
        assert!(blocked.is_err(), "second acquire should wait for a free slot");

        drop(held);
        let admitted = tokio::time::timeout(Duration::from_millis(500), limiter.acquire()).await;
        assert!(admitted.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_peak_never_exceeds_limit() {
        let limiter = ConcurrencyLimiter::new(3).unwrap();

        let handles: Vec<_> = (0..30)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    let _slot = limiter.acquire().await;
                    tokio::time::sleep(Duration::from_millis(2)).await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(limiter.peak_in_flight() <= 3);
        assert!(limiter.peak_in_flight() >= 1);
        assert_eq!(limiter.in_flight(), 0);
        assert_eq!(limiter.available(), 3);
    }
}
