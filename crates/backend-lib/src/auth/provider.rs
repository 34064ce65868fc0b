// ============================
// crates/backend-lib/src/auth/provider.rs
// ============================
//! Credential providers.
//!
//! Each provider owns one credential path: it deserializes the raw payload,
//! runs the schema checks, and hands the result to the resolver. The caller
//! picks the provider by route; providers never branch into each other's
//! paths.

use crate::auth::resolver::IdentityResolver;
use crate::error::AppError;
use crate::store::IdentityStore;
use crate::validation::{self, FieldError, ValidationError};
use async_trait::async_trait;
use saberpro_common::{
    ActivationCredentials, EmailCredentials, SessionClaims, StudentIdCredentials,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One credential path: raw payload in, session claims or rejection out.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn authorize(&self, raw: Value) -> Result<SessionClaims, AppError>;
}

fn parse_payload<T: DeserializeOwned>(raw: Value) -> Result<T, AppError> {
    serde_json::from_value(raw).map_err(|_| {
        AppError::Validation(ValidationError::new(vec![FieldError::new(
            "payload",
            "Malformed request payload",
        )]))
    })
}

/// Email/password path. The payload's `action` field selects login
/// (default) or registration.
pub struct EmailProvider<S> {
    resolver: IdentityResolver<S>,
}

impl<S: IdentityStore> EmailProvider<S> {
    pub fn new(resolver: IdentityResolver<S>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl<S: IdentityStore> CredentialProvider for EmailProvider<S> {
    async fn authorize(&self, raw: Value) -> Result<SessionClaims, AppError> {
        let creds: EmailCredentials = parse_payload(raw)?;
        validation::validate_email_credentials(&creds)?;

        match creds.action.as_deref() {
            Some("register") => {
                // Presence enforced by validation above.
                let name = creds.name.as_deref().unwrap_or_default();
                self.resolver
                    .register(&creds.email, creds.password, name)
                    .await
            },
            _ => {
                self.resolver
                    .login_with_email(&creds.email, &creds.password)
                    .await
            },
        }
    }
}

/// Student-number login path.
pub struct StudentIdProvider<S> {
    resolver: IdentityResolver<S>,
}

impl<S: IdentityStore> StudentIdProvider<S> {
    pub fn new(resolver: IdentityResolver<S>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl<S: IdentityStore> CredentialProvider for StudentIdProvider<S> {
    async fn authorize(&self, raw: Value) -> Result<SessionClaims, AppError> {
        let creds: StudentIdCredentials = parse_payload(raw)?;
        validation::validate_student_id_credentials(&creds)?;

        self.resolver
            .login_with_student_id(&creds.student_id, &creds.password)
            .await
    }
}

/// Student activation path.
pub struct ActivationProvider<S> {
    resolver: IdentityResolver<S>,
}

impl<S: IdentityStore> ActivationProvider<S> {
    pub fn new(resolver: IdentityResolver<S>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl<S: IdentityStore> CredentialProvider for ActivationProvider<S> {
    async fn authorize(&self, raw: Value) -> Result<SessionClaims, AppError> {
        let creds: ActivationCredentials = parse_payload(raw)?;
        validation::validate_activation_credentials(&creds)?;

        self.resolver
            .activate_student(&creds.student_id, creds.password)
            .await
    }
}
