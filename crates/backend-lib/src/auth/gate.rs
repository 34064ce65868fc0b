// ============================
// crates/backend-lib/src/auth/gate.rs
// ============================
//! Route authorization gate.
//!
//! A pure decision over (session claims, request path), consulted by the
//! middleware on every request. The always-allow exemptions are checked
//! first, unconditionally, before the no-session check.

use saberpro_common::{Role, SessionClaims};

/// Dashboard prefixes gated by role.
pub const ADMIN_PREFIX: &str = "/admin";
pub const TEACHER_PREFIX: &str = "/teacher";
pub const STUDENT_PREFIX: &str = "/student";

/// Where unauthenticated page requests are sent.
pub const LOGIN_PAGE: &str = "/login";

const API_PREFIX: &str = "/api";

/// Paths reachable with no session: the auth API itself, static assets,
/// the login page, and the pre-login student check.
const PUBLIC_PREFIXES: &[&str] = &["/api/auth", "/_assets"];
const PUBLIC_PATHS: &[&str] = &[LOGIN_PAGE, "/favicon.ico"];

/// Outcome of a gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// No session on a page route
    RedirectToLogin,
    /// Session present but the role does not match the area
    Forbidden,
}

/// Prefix match on path-segment boundaries, so `/admin` does not capture
/// `/administration`.
fn under(path: &str, prefix: &str) -> bool {
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|p| under(path, p))
}

/// Decide whether a request may proceed.
///
/// Non-auth API routes are let through for the handlers' own checks; the
/// gate only escorts page traffic.
pub fn decide(claims: Option<&SessionClaims>, path: &str) -> RouteDecision {
    if is_public(path) {
        return RouteDecision::Allow;
    }

    let Some(claims) = claims else {
        if under(path, API_PREFIX) {
            return RouteDecision::Allow;
        }
        return RouteDecision::RedirectToLogin;
    };

    if under(path, ADMIN_PREFIX) && !claims.role.is_admin() {
        return RouteDecision::Forbidden;
    }
    if under(path, TEACHER_PREFIX) && claims.role != Role::Teacher {
        return RouteDecision::Forbidden;
    }
    if under(path, STUDENT_PREFIX) && claims.role != Role::Student {
        return RouteDecision::Forbidden;
    }

    RouteDecision::Allow
}
