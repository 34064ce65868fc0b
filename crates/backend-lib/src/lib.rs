// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core library for the `SaberPro` auth backend: credential validation,
//! password hashing, identity resolution, session issuance, and the
//! role-based route gate.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod store;
pub mod validation;

use crate::auth::{AuthRateLimiter, IdentityResolver, SessionManager};
use crate::config::Settings;
use crate::store::IdentityStore;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Identity store handle, injected rather than global
    pub store: Arc<S>,
    /// Session manager
    pub sessions: SessionManager,
    /// Settings
    pub settings: Arc<Settings>,
    /// Auth endpoint lockout
    pub rate_limiter: AuthRateLimiter,
}

impl<S: IdentityStore> AppState<S> {
    /// Create a new application state. Must run inside a tokio runtime
    /// (the session manager spawns its cleanup task).
    pub fn new(store: S, settings: Settings) -> Self {
        let sessions = SessionManager::new(Duration::from_secs(settings.session_ttl_secs));
        let rate_limiter = AuthRateLimiter::new(
            settings.auth_rate_limit.max_failures,
            Duration::from_secs(settings.auth_rate_limit.lockout_secs),
        );

        Self {
            store: Arc::new(store),
            sessions,
            settings: Arc::new(settings),
            rate_limiter,
        }
    }

    /// A resolver bound to this state's store and hashing parameters.
    pub fn resolver(&self) -> IdentityResolver<S> {
        IdentityResolver::new(self.store.clone(), self.settings.pbkdf2_iterations)
    }
}
