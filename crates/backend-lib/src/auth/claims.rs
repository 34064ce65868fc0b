// crates/backend-lib/src/auth/claims.rs

//! Session claim construction.

use crate::store::Identity;
use saberpro_common::SessionClaims;

/// Shape a resolved identity into the minimal claims object carried by the
/// session token. Pure; a missing display name becomes an empty string.
pub fn build_claims(identity: &Identity) -> SessionClaims {
    SessionClaims {
        id: identity.id,
        name: identity.name.clone().unwrap_or_default(),
        email: identity.email.clone(),
        role: identity.role,
        is_onboarded: identity.is_onboarded,
    }
}
