//! Fixed-window login rate limiter
//!
//! Per-client-address attempt counter reset at fixed intervals. Owned by
//! `AppState` so lifetime and test isolation are explicit; not persisted across
//! restarts and not shared between server instances. Expired windows are
//! dropped by a periodic `sweep` spawned at startup.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { retry_after_secs: u64 },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    attempts: u32,
}

pub struct LoginRateLimiter {
    windows: DashMap<String, Window>,
    max_attempts: u32,
    window: Duration,
}

impl LoginRateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_attempts,
            window,
        }
    }

    /// Record an attempt for `key` and decide whether it is allowed.
    /// The first attempt after a window expires opens a fresh window.
    pub fn check(&self, key: &str) -> Decision {
        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            attempts: 0,
        });

        if now.duration_since(entry.started_at) >= self.window {
            entry.started_at = now;
            entry.attempts = 0;
        }

        if entry.attempts >= self.max_attempts {
            let elapsed = now.duration_since(entry.started_at);
            let remaining = self.window.saturating_sub(elapsed);
            return Decision::Deny {
                retry_after_secs: remaining.as_secs().max(1),
            };
        }

        entry.attempts += 1;
        Decision::Allow
    }

    /// Drop windows that have expired. Called on a timer from main.
    pub fn sweep(&self) {
        let now = Instant::now();
        let window = self.window;
        self.windows
            .retain(|_, w| now.duration_since(w.started_at) < window);
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = LoginRateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert_eq!(limiter.check("10.0.0.1"), Decision::Allow);
        }
        assert!(matches!(limiter.check("10.0.0.1"), Decision::Deny { .. }));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = LoginRateLimiter::new(1, Duration::from_secs(60));
        assert_eq!(limiter.check("10.0.0.1"), Decision::Allow);
        assert!(matches!(limiter.check("10.0.0.1"), Decision::Deny { .. }));
        assert_eq!(limiter.check("10.0.0.2"), Decision::Allow);
    }

    #[test]
    fn test_window_resets() {
        let limiter = LoginRateLimiter::new(1, Duration::from_millis(20));
        assert_eq!(limiter.check("10.0.0.1"), Decision::Allow);
        assert!(matches!(limiter.check("10.0.0.1"), Decision::Deny { .. }));
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(limiter.check("10.0.0.1"), Decision::Allow);
    }

    #[test]
    fn test_sweep_drops_expired_windows() {
        let limiter = LoginRateLimiter::new(5, Duration::from_millis(20));
        limiter.check("10.0.0.1");
        limiter.check("10.0.0.2");
        assert_eq!(limiter.tracked_keys(), 2);
        std::thread::sleep(Duration::from_millis(30));
        limiter.sweep();
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn test_deny_reports_retry_after() {
        let limiter = LoginRateLimiter::new(1, Duration::from_secs(60));
        limiter.check("10.0.0.1");
        match limiter.check("10.0.0.1") {
            Decision::Deny { retry_after_secs } => {
                assert!(retry_after_secs >= 1 && retry_after_secs <= 60);
            }
            Decision::Allow => panic!("expected deny"),
        }
    }
}
