//! Keyed fixed-window rate limiter.
//!
//! Each key owns its own lock; unrelated keys never contend. A window opens at
//! the first hit for a key and resets once `window` has elapsed.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::Instant;

/// Result of a rate-limited attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitOutcome {
    /// Attempt counted. `remaining` attempts are left in the window.
    Allowed { remaining: u32 },
    /// Budget exhausted. The attempt was not counted.
    Denied { retry_after: Duration },
}

impl RateLimitOutcome {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Debug, Default)]
struct WindowState {
    window_start: Option<Instant>,
    count: u32,
}

impl WindowState {
    fn hit(&mut self, now: Instant, limit: u32, window: Duration) -> RateLimitOutcome {
        let start = match self.window_start {
            Some(start) if now.saturating_duration_since(start) < window => start,
            _ => {
                self.window_start = Some(now);
                self.count = 0;
                now
            }
        };

        if self.count >= limit {
            return RateLimitOutcome::Denied {
                retry_after: window.saturating_sub(now.saturating_duration_since(start)),
            };
        }

        self.count += 1;
        RateLimitOutcome::Allowed {
            remaining: limit - self.count,
        }
    }

    fn is_expired(&self, now: Instant, window: Duration) -> bool {
        self.window_start
            .is_none_or(|start| now.saturating_duration_since(start) >= window)
    }
}

/// Fixed-window counters keyed by string.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: DashMap<String, Arc<Mutex<WindowState>>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an attempt against `key`, or deny it when `limit` attempts were
    /// already made in the current window.
    pub fn allow(&self, key: &str, limit: u32, window: Duration) -> RateLimitOutcome {
        let cell = self.cell(key);
        let mut state = cell.lock();
        state.hit(Instant::now(), limit, window)
    }

    /// Drop keys whose window has expired. Returns the number removed.
    ///
    /// Cells borrowed by an in-flight [`allow`](Self::allow) are kept.
    pub fn purge_expired(&self, window: Duration) -> usize {
        let now = Instant::now();
        let before = self.windows.len();
        self.windows.retain(|_, cell| {
            if Arc::strong_count(cell) > 1 {
                return true;
            }
            cell.try_lock()
                .is_none_or(|state| !state.is_expired(now, window))
        });
        before.saturating_sub(self.windows.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn cell(&self, key: &str) -> Arc<Mutex<WindowState>> {
        if let Some(cell) = self.windows.get(key) {
            return Arc::clone(cell.value());
        }
        Arc::clone(
            self.windows
                .entry(key.to_owned())
                .or_default()
                .value(),
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use tokio::sync::Barrier;

    const WINDOW: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn admits_up_to_limit_then_denies() {
        let limiter = RateLimiter::new();

        for expected_remaining in (0..5).rev() {
            assert_eq!(
                limiter.allow("create-resource|u1", 5, WINDOW),
                RateLimitOutcome::Allowed {
                    remaining: expected_remaining
                }
            );
        }

        match limiter.allow("create-resource|u1", 5, WINDOW) {
            RateLimitOutcome::Denied { retry_after } => {
                assert!(retry_after > Duration::ZERO);
                assert!(retry_after <= WINDOW);
            }
            other => panic!("expected Denied, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_decreases_to_zero() {
        let limiter = RateLimiter::new();
        limiter.allow("k", 1, WINDOW);

        tokio::time::advance(Duration::from_secs(20)).await;
        let RateLimitOutcome::Denied { retry_after: first } = limiter.allow("k", 1, WINDOW) else {
            panic!("expected Denied");
        };
        assert_eq!(first, Duration::from_secs(40));

        tokio::time::advance(Duration::from_secs(30)).await;
        let RateLimitOutcome::Denied { retry_after: second } = limiter.allow("k", 1, WINDOW)
        else {
            panic!("expected Denied");
        };
        assert_eq!(second, Duration::from_secs(10));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(limiter.allow("k", 1, WINDOW).is_allowed());
    }

    #[tokio::test(start_paused = true)]
    async fn huge_window_denies_without_overflow() {
        let limiter = RateLimiter::new();
        let window = Duration::from_secs(u64::MAX);
        assert!(limiter.allow("k", 1, window).is_allowed());

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(
            limiter.allow("k", 1, window),
            RateLimitOutcome::Denied {
                retry_after: window - Duration::from_secs(5)
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn denied_attempts_do_not_extend_window() {
        let limiter = RateLimiter::new();
        limiter.allow("k", 2, WINDOW);
        limiter.allow("k", 2, WINDOW);

        for _ in 0..10 {
            tokio::time::advance(Duration::from_secs(5)).await;
            assert!(!limiter.allow("k", 2, WINDOW).is_allowed());
        }

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(
            limiter.allow("k", 2, WINDOW),
            RateLimitOutcome::Allowed { remaining: 1 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn window_opens_at_first_hit() {
        let limiter = RateLimiter::new();
        tokio::time::advance(Duration::from_secs(45)).await;
        limiter.allow("k", 1, WINDOW);

        // Not calendar aligned: 30s later is still the same window.
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(!limiter.allow("k", 1, WINDOW).is_allowed());

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(limiter.allow("k", 1, WINDOW).is_allowed());
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_independent() {
        let limiter = RateLimiter::new();
        limiter.allow("create-resource|u1", 1, WINDOW);

        assert!(!limiter.allow("create-resource|u1", 1, WINDOW).is_allowed());
        assert!(limiter.allow("create-resource|u2", 1, WINDOW).is_allowed());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_limit_always_denies() {
        let limiter = RateLimiter::new();
        assert!(!limiter.allow("k", 0, WINDOW).is_allowed());
    }

    #[tokio::test(start_paused = true)]
    async fn purge_drops_only_expired_windows() {
        let limiter = RateLimiter::new();
        limiter.allow("old", 5, WINDOW);
        tokio::time::advance(Duration::from_secs(50)).await;
        limiter.allow("fresh", 5, WINDOW);
        tokio::time::advance(Duration::from_secs(15)).await;

        assert_eq!(limiter.purge_expired(WINDOW), 1);
        assert_eq!(limiter.len(), 1);
        assert_eq!(
            limiter.allow("fresh", 5, WINDOW),
            RateLimitOutcome::Allowed { remaining: 3 }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_attempts_admit_exactly_limit() {
        let limiter = Arc::new(RateLimiter::new());
        let barrier = Arc::new(Barrier::new(20));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    limiter.allow("create-resource|shared", 5, WINDOW)
                })
            })
            .collect();

        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap().is_allowed() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 5);
    }
}
