// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Rate limiting for authentication attempts.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default number of failed attempts before lockout
const DEFAULT_MAX_FAILURES: u32 = 5;

/// Default lockout duration (5 minutes)
const DEFAULT_LOCKOUT: Duration = Duration::from_secs(5 * 60);

/// How long an idle failure entry is kept around
const ENTRY_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct FailureEntry {
    failures: u32,
    last_failure: Instant,
    locked_until: Option<Instant>,
}

/// Per-client lockout for the credential endpoints. Keyed by the client
/// identifier the reverse proxy reports; checked before any hashing work.
#[derive(Debug, Clone)]
pub struct AuthRateLimiter {
    entries: Arc<DashMap<String, FailureEntry>>,
    max_failures: u32,
    lockout: Duration,
}

impl Default for AuthRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FAILURES, DEFAULT_LOCKOUT)
    }
}

impl AuthRateLimiter {
    pub fn new(max_failures: u32, lockout: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_failures: max_failures.max(1),
            lockout,
        }
    }

    /// Whether this client may attempt authentication right now.
    pub fn check(&self, client: &str) -> bool {
        match self.entries.get(client) {
            Some(entry) => match entry.locked_until {
                Some(until) => Instant::now() >= until,
                None => true,
            },
            None => true,
        }
    }

    /// Record a failed credential check.
    pub fn record_failure(&self, client: &str) {
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(client.to_string())
            .or_insert_with(|| FailureEntry {
                failures: 0,
                last_failure: now,
                locked_until: None,
            });

        // An expired lockout resets the window.
        if entry.locked_until.is_some_and(|until| now >= until) {
            entry.failures = 0;
            entry.locked_until = None;
        }

        entry.failures += 1;
        entry.last_failure = now;

        if entry.failures >= self.max_failures {
            entry.locked_until = Some(now + self.lockout);
            tracing::warn!(client, failures = entry.failures, "auth lockout engaged");
        }
    }

    /// Clear the failure history after a successful authentication.
    pub fn record_success(&self, client: &str) {
        self.entries.remove(client);
    }

    /// Drop expired lockouts and stale entries.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| {
            if let Some(until) = entry.locked_until {
                return now < until;
            }
            now.duration_since(entry.last_failure) < ENTRY_RETENTION
        });
    }
}
