// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
//!
//! Claims are merged into an opaque token at issue time and projected back
//! on every request without touching the identity store. The explicit
//! `update` call is the trusted path for refreshing role and onboarding
//! state into a live session.
use metrics::{counter, gauge};
use saberpro_common::SessionClaims;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7); // 7 days

/// A live session: the claims plus its lifetime bounds.
#[derive(Clone, Debug)]
pub struct Session {
    pub claims: SessionClaims,
    pub created_at: SystemTime,
    pub expires_at: SystemTime,
}

/// Session manager for handling authentication tokens
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionManager {
    /// Create a new session manager and spawn its cleanup task.
    pub fn new(ttl: Duration) -> Self {
        let manager = SessionManager {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        };

        let manager_clone = manager.clone();
        tokio::spawn(async move {
            manager_clone.cleanup_task().await;
        });

        manager
    }

    /// Issue a token for freshly resolved claims.
    pub async fn issue(&self, claims: SessionClaims) -> String {
        let token = Uuid::new_v4().to_string();
        let now = SystemTime::now();
        let session = Session {
            claims,
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);

        counter!("session.issued").increment(1);
        gauge!("session.active").set(sessions.len() as f64);

        token
    }

    /// Project a token back into its claims. Expired tokens project to
    /// nothing, same as unknown ones.
    pub async fn project(&self, token: &str) -> Option<SessionClaims> {
        self.get(token).await.map(|s| s.claims)
    }

    /// Get a live session by token.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;
        if SystemTime::now() >= session.expires_at {
            return None;
        }
        Some(session.clone())
    }

    /// Merge fresh claims into a live session, keeping its expiry. Returns
    /// false when the token is unknown or expired.
    pub async fn update(&self, token: &str, claims: SessionClaims) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(session) if SystemTime::now() < session.expires_at => {
                session.claims = claims;
                true
            },
            _ => false,
        }
    }

    /// Drop a session. Returns false when the token was not present.
    pub async fn revoke(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(token).is_some();
        if removed {
            counter!("session.revoked").increment(1);
            gauge!("session.active").set(sessions.len() as f64);
        }
        removed
    }

    /// Cleanup task that runs periodically to remove expired sessions
    async fn cleanup_task(&self) {
        let cleanup_interval = Duration::from_secs(60 * 60); // 1 hour

        loop {
            tokio::time::sleep(cleanup_interval).await;

            let mut sessions = self.sessions.write().await;
            let now = SystemTime::now();
            let before_count = sessions.len();

            sessions.retain(|_, session| now < session.expires_at);

            let removed = before_count - sessions.len();
            if removed > 0 {
                counter!("session.expired").increment(removed as u64);
                gauge!("session.active").set(sessions.len() as f64);
            }
        }
    }
}
