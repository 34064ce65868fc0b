// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod claims;
pub mod gate;
pub mod password;
pub mod provider;
pub mod rate_limit;
pub mod resolver;
pub mod session;

pub use claims::build_claims;
pub use gate::{decide, RouteDecision};
pub use password::{hash_password, verify_credential, CredentialRecord, DEFAULT_ITERATIONS};
pub use provider::{ActivationProvider, CredentialProvider, EmailProvider, StudentIdProvider};
pub use rate_limit::AuthRateLimiter;
pub use resolver::IdentityResolver;
pub use session::{Session, SessionManager, SESSION_TTL};
