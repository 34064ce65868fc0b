// ============================
// crates/backend-lib/src/store.rs
// ============================
//! Identity persistence: the store trait plus the flat-file implementation.
use crate::auth::password::CredentialRecord;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use saberpro_common::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};
use tokio::fs as tokio_fs;
use tokio::sync::RwLock;
use uuid::Uuid;

/// 1:1 extension of an identity for role STUDENT.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StudentProfile {
    /// 6-digit student number, unique across the store
    pub student_id: String,
    /// One-way flag; false until the student runs the activation flow
    pub is_activated: bool,
    pub joined_at: DateTime<Utc>,
}

/// A durable login-capable actor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    /// Display name; absent for some imported records
    pub name: Option<String>,
    /// Unique, stored lowercased
    pub email: String,
    pub role: Role,
    pub is_onboarded: bool,
    pub credential: CredentialRecord,
    pub student: Option<StudentProfile>,
}

/// Fields needed to create an identity. The store assigns the id and
/// initializes `is_onboarded` to false.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub name: Option<String>,
    pub email: String,
    pub role: Role,
    pub credential: CredentialRecord,
    pub student: Option<StudentProfile>,
}

/// Trait for identity storage backends.
///
/// The store is the final arbiter for email uniqueness: `create` must
/// translate a duplicate (including one that raced past the caller's
/// pre-check) into `AppError::Conflict`, never a raw backend error.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, AppError>;

    /// Look up the identity owning a student profile with this number.
    async fn find_by_student_id(&self, student_id: &str) -> Result<Option<Identity>, AppError>;

    async fn create(&self, new: NewIdentity) -> Result<Identity, AppError>;

    /// Replace the stored credential for an existing identity, leaving
    /// every other field untouched. Callers resolve the identity first;
    /// a vanished id maps to `AppError::Auth`.
    async fn update_credential(
        &self,
        id: Uuid,
        credential: CredentialRecord,
    ) -> Result<Identity, AppError>;

    /// Persist a new credential and flip the activation flag as one unit.
    /// Either both changes land or the record stays untouched.
    async fn activate_student(
        &self,
        id: Uuid,
        credential: CredentialRecord,
    ) -> Result<Identity, AppError>;
}

const SNAPSHOT_FILE: &str = "identities.json";

/// Flat-file implementation of the `IdentityStore` trait.
///
/// All records live in one JSON snapshot under the data directory, loaded
/// at startup into an `RwLock`-guarded map. Writers serialize on the lock,
/// which makes the in-lock uniqueness check authoritative, and every
/// mutation is persisted with a temp-file + rename so a failed write leaves
/// the previous snapshot intact.
pub struct FlatFileIdentityStore {
    path: PathBuf,
    identities: RwLock<HashMap<Uuid, Identity>>,
}

impl FlatFileIdentityStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        let path = root.join(SNAPSHOT_FILE);

        let identities = match fs::read_to_string(&path) {
            Ok(content) => {
                let records: Vec<Identity> = serde_json::from_str(&content)?;
                records.into_iter().map(|i| (i.id, i)).collect()
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            identities: RwLock::new(identities),
        })
    }

    /// Number of stored identities.
    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }

    /// Write the full snapshot. Called with the write lock held; the
    /// rename keeps the old snapshot when the write fails midway.
    async fn persist(&self, identities: &HashMap<Uuid, Identity>) -> Result<(), AppError> {
        let mut records: Vec<&Identity> = identities.values().collect();
        records.sort_by_key(|i| i.id);

        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| AppError::Store(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for FlatFileIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AppError> {
        let identities = self.identities.read().await;
        Ok(identities
            .values()
            .find(|i| i.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, AppError> {
        let identities = self.identities.read().await;
        Ok(identities.get(&id).cloned())
    }

    async fn find_by_student_id(&self, student_id: &str) -> Result<Option<Identity>, AppError> {
        let identities = self.identities.read().await;
        Ok(identities
            .values()
            .find(|i| {
                i.student
                    .as_ref()
                    .is_some_and(|s| s.student_id == student_id)
            })
            .cloned())
    }

    async fn create(&self, new: NewIdentity) -> Result<Identity, AppError> {
        let mut identities = self.identities.write().await;

        // Uniqueness checks under the write lock settle concurrent
        // registrations with the same email.
        if identities
            .values()
            .any(|i| i.email.eq_ignore_ascii_case(&new.email))
        {
            return Err(AppError::Conflict);
        }
        if let Some(profile) = &new.student {
            if identities.values().any(|i| {
                i.student
                    .as_ref()
                    .is_some_and(|s| s.student_id == profile.student_id)
            }) {
                return Err(AppError::Conflict);
            }
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email.to_ascii_lowercase(),
            role: new.role,
            is_onboarded: false,
            credential: new.credential,
            student: new.student,
        };

        identities.insert(identity.id, identity.clone());
        if let Err(err) = self.persist(&identities).await {
            identities.remove(&identity.id);
            return Err(err);
        }

        Ok(identity)
    }

    async fn update_credential(
        &self,
        id: Uuid,
        credential: CredentialRecord,
    ) -> Result<Identity, AppError> {
        let mut identities = self.identities.write().await;

        let original = identities.get(&id).cloned().ok_or(AppError::Auth)?;

        let mut updated = original.clone();
        updated.credential = credential;

        identities.insert(id, updated.clone());
        if let Err(err) = self.persist(&identities).await {
            // Roll back so memory matches the surviving snapshot.
            identities.insert(id, original);
            return Err(err);
        }

        Ok(updated)
    }

    async fn activate_student(
        &self,
        id: Uuid,
        credential: CredentialRecord,
    ) -> Result<Identity, AppError> {
        let mut identities = self.identities.write().await;

        let original = identities
            .get(&id)
            .cloned()
            .ok_or(AppError::StudentNotFound)?;
        let Some(profile) = &original.student else {
            return Err(AppError::StudentNotFound);
        };
        if profile.is_activated {
            return Err(AppError::AlreadyActivated);
        }

        let mut updated = original.clone();
        updated.credential = credential;
        if let Some(profile) = updated.student.as_mut() {
            profile.is_activated = true;
        }

        identities.insert(id, updated.clone());
        if let Err(err) = self.persist(&identities).await {
            // Roll back so memory matches the surviving snapshot.
            identities.insert(id, original);
            return Err(err);
        }

        Ok(updated)
    }
}
