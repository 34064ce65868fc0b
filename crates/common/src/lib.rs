// ================
// common/src/lib.rs
// ================
//! Common types shared between the `SaberPro` auth server and its clients.
//! This module defines the credential payloads, the session claims object,
//! and the API response shapes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles an identity can hold. Assigned once at registration (STUDENT by
/// default) and never changed by the auth subsystem itself; only the trusted
/// session refresh path re-reads it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Student,
    Teacher,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Whether this role may enter the admin area.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Student => "STUDENT",
            Role::Teacher => "TEACHER",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPERADMIN",
        };
        f.write_str(s)
    }
}

/// Email/password credential payload, used for both login and registration.
/// # Fields
/// * `email` - account email address
/// * `password` - plaintext password (min 6 chars)
/// * `name` - display name, required when registering
/// * `action` - "login" (default) or "register"
/// * `source` - free-form origin tag set by the client, not interpreted
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EmailCredentials {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Student-number credential payload.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StudentIdCredentials {
    /// 6-digit student number
    pub student_id: String,
    pub password: String,
}

/// Payload for activating a pre-provisioned student account.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivationCredentials {
    pub student_id: String,
    pub password: String,
    pub confirm_password: String,
}

/// The per-session projection of an identity. Built fresh on every
/// successful credential check and carried by the session token; it is not
/// re-read from the store on each request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub id: Uuid,
    /// Display name; empty string when the identity has none.
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_onboarded: bool,
}

/// Response to a successful authentication call.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Opaque bearer token for subsequent requests
    pub token: String,
    pub claims: SessionClaims,
}

/// Response to the pre-login student check.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentCheck {
    pub exists: bool,
    pub is_activated: bool,
}
