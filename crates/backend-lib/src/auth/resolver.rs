// ============================
// crates/backend-lib/src/auth/resolver.rs
// ============================
//! Identity resolution: validated credentials in, session claims or a
//! definitive rejection out. Four mutually exclusive paths, each one or two
//! store round-trips plus at most one password derivation.

use crate::auth::claims::build_claims;
use crate::auth::password::{
    hash_password_secure, verify_credential, CredentialRecord,
};
use crate::error::AppError;
use crate::store::{IdentityStore, NewIdentity};
use saberpro_common::{Role, SessionClaims};
use std::sync::Arc;
use zeroize::Zeroize;

/// Resolves credentials against an explicitly injected store handle.
pub struct IdentityResolver<S> {
    store: Arc<S>,
    iterations: u32,
}

impl<S: IdentityStore> IdentityResolver<S> {
    pub fn new(store: Arc<S>, iterations: u32) -> Self {
        Self { store, iterations }
    }

    /// Email + password login.
    ///
    /// Unknown email and wrong password collapse into the same generic
    /// rejection so the endpoint cannot be used to enumerate accounts.
    /// The password check is unconditional on this path.
    pub async fn login_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionClaims, AppError> {
        let Some(identity) = self.store.find_by_email(email).await? else {
            return Err(AppError::Auth);
        };

        if !verify_credential(&identity.credential, password) {
            tracing::debug!(email, "email login rejected");
            return Err(AppError::Auth);
        }

        Ok(build_claims(&identity))
    }

    /// Register a new account with role STUDENT.
    ///
    /// The pre-check gives the common case a clean `Conflict`; the store's
    /// own uniqueness arbiter catches the race where two registrations
    /// carry the same email concurrently.
    pub async fn register(
        &self,
        email: &str,
        mut password: String,
        name: &str,
    ) -> Result<SessionClaims, AppError> {
        // Callers must have validated the payload; an empty name here is a
        // programming error, not user input.
        debug_assert!(!name.trim().is_empty(), "register called without a name");

        if self.store.find_by_email(email).await?.is_some() {
            password.zeroize();
            return Err(AppError::Conflict);
        }

        let credential = hash_password_secure(&mut password, self.iterations);
        let identity = self
            .store
            .create(NewIdentity {
                name: Some(name.to_string()),
                email: email.to_string(),
                role: Role::Student,
                credential,
                student: None,
            })
            .await?;

        tracing::info!(id = %identity.id, "account registered");
        Ok(build_claims(&identity))
    }

    /// Student-number login. Only activated profiles may establish a
    /// session; an inactive one is pointed at the activation flow instead
    /// of getting a generic credential failure.
    pub async fn login_with_student_id(
        &self,
        student_id: &str,
        password: &str,
    ) -> Result<SessionClaims, AppError> {
        let Some(identity) = self.store.find_by_student_id(student_id).await? else {
            return Err(AppError::StudentNotFound);
        };
        let profile = identity
            .student
            .as_ref()
            .ok_or_else(|| AppError::Internal("student lookup returned no profile".to_string()))?;

        if !profile.is_activated {
            return Err(AppError::InactiveAccount);
        }

        if !verify_credential(&identity.credential, password) {
            tracing::debug!(student_id, "student login rejected");
            return Err(AppError::Auth);
        }

        Ok(build_claims(&identity))
    }

    /// Activate a pre-provisioned student account, setting its password.
    ///
    /// The new credential keeps whichever representation the record already
    /// uses; flipping a legacy plaintext record to a hash here would break
    /// the one-representation invariant the rest of the system relies on.
    /// The credential write and the activation flag land atomically in the
    /// store or not at all.
    pub async fn activate_student(
        &self,
        student_id: &str,
        mut password: String,
    ) -> Result<SessionClaims, AppError> {
        let Some(identity) = self.store.find_by_student_id(student_id).await? else {
            password.zeroize();
            return Err(AppError::StudentNotFound);
        };
        let profile = identity
            .student
            .as_ref()
            .ok_or_else(|| AppError::Internal("student lookup returned no profile".to_string()))?;

        if profile.is_activated {
            password.zeroize();
            return Err(AppError::AlreadyActivated);
        }

        let credential = match &identity.credential {
            CredentialRecord::Hashed { .. } => hash_password_secure(&mut password, self.iterations),
            CredentialRecord::Plaintext { .. } => {
                let record = CredentialRecord::Plaintext {
                    value: password.clone(),
                };
                password.zeroize();
                record
            },
        };

        let updated = self.store.activate_student(identity.id, credential).await?;
        tracing::info!(id = %updated.id, "student account activated");
        Ok(build_claims(&updated))
    }

    /// Trusted refresh trigger: re-read the identity and rebuild claims so
    /// role or onboarding changes reach a live session.
    pub async fn refresh_claims(&self, current: &SessionClaims) -> Result<SessionClaims, AppError> {
        let Some(identity) = self.store.find_by_id(current.id).await? else {
            // The account vanished underneath the session.
            return Err(AppError::Auth);
        };
        Ok(build_claims(&identity))
    }
}
