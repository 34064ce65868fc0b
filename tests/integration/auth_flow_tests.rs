use chrono::Utc;
use saberpro_backend_lib::auth::password::{hash_password, CredentialRecord, MIN_ITERATIONS};
use saberpro_backend_lib::auth::provider::{
    ActivationProvider, CredentialProvider, EmailProvider, StudentIdProvider,
};
use saberpro_backend_lib::auth::IdentityResolver;
use saberpro_backend_lib::error::AppError;
use saberpro_backend_lib::store::{
    FlatFileIdentityStore, IdentityStore, NewIdentity, StudentProfile,
};
use saberpro_common::Role;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn open_store() -> (TempDir, Arc<FlatFileIdentityStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FlatFileIdentityStore::new(dir.path()).unwrap());
    (dir, store)
}

fn resolver(store: &Arc<FlatFileIdentityStore>) -> IdentityResolver<FlatFileIdentityStore> {
    IdentityResolver::new(store.clone(), MIN_ITERATIONS)
}

async fn seed_student(
    store: &Arc<FlatFileIdentityStore>,
    student_id: &str,
    credential: CredentialRecord,
) {
    store
        .create(NewIdentity {
            name: Some("Seeded Student".to_string()),
            email: format!("{student_id}@school.edu"),
            role: Role::Student,
            credential,
            student: Some(StudentProfile {
                student_id: student_id.to_string(),
                is_activated: false,
                joined_at: Utc::now(),
            }),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_then_duplicate_email_conflicts() {
    let (_dir, store) = open_store();
    let resolver = resolver(&store);

    let claims = resolver
        .register("a@b.com", "secret1".to_string(), "A")
        .await
        .unwrap();
    assert_eq!(claims.role, Role::Student);
    assert!(!claims.is_onboarded);
    assert_eq!(claims.name, "A");

    // Same email fails regardless of whether the password matches.
    let err = resolver
        .register("a@b.com", "secret1".to_string(), "A")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict));
    let err = resolver
        .register("A@B.com", "different9".to_string(), "B")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict));
}

#[tokio::test]
async fn test_email_login_is_generic_about_failures() {
    let (_dir, store) = open_store();
    let resolver = resolver(&store);

    resolver
        .register("a@b.com", "secret1".to_string(), "A")
        .await
        .unwrap();

    assert!(resolver.login_with_email("a@b.com", "secret1").await.is_ok());

    // Wrong password and unknown email produce the same rejection.
    let wrong_pw = resolver
        .login_with_email("a@b.com", "wrong-pass")
        .await
        .unwrap_err();
    let unknown = resolver
        .login_with_email("nobody@b.com", "secret1")
        .await
        .unwrap_err();
    assert!(matches!(wrong_pw, AppError::Auth));
    assert!(matches!(unknown, AppError::Auth));
}

#[tokio::test]
async fn test_inactive_student_must_activate_before_login() {
    let (_dir, store) = open_store();
    let resolver = resolver(&store);
    seed_student(&store, "123456", hash_password("provisional1", MIN_ITERATIONS)).await;

    // Correct password, but the profile is not activated yet.
    let err = resolver
        .login_with_student_id("123456", "provisional1")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InactiveAccount));

    // Unknown student number is a distinct failure.
    let err = resolver
        .login_with_student_id("999999", "provisional1")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StudentNotFound));

    // Activation sets the new password and unlocks login.
    let claims = resolver
        .activate_student("123456", "newpass1".to_string())
        .await
        .unwrap();
    assert_eq!(claims.role, Role::Student);

    let claims = resolver
        .login_with_student_id("123456", "newpass1")
        .await
        .unwrap();
    assert_eq!(claims.name, "Seeded Student");

    // The provisional password no longer works.
    let err = resolver
        .login_with_student_id("123456", "provisional1")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth));
}

#[tokio::test]
async fn test_second_activation_fails_and_keeps_credentials() {
    let (_dir, store) = open_store();
    let resolver = resolver(&store);
    seed_student(&store, "123456", hash_password("provisional1", MIN_ITERATIONS)).await;

    resolver
        .activate_student("123456", "newpass1".to_string())
        .await
        .unwrap();

    let err = resolver
        .activate_student("123456", "otherpass2".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyActivated));

    // The first activation's password is still the one that works.
    assert!(resolver
        .login_with_student_id("123456", "newpass1")
        .await
        .is_ok());
    let err = resolver
        .login_with_student_id("123456", "otherpass2")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth));
}

#[tokio::test]
async fn test_activation_preserves_legacy_plaintext_scheme() {
    let (_dir, store) = open_store();
    let resolver = resolver(&store);
    seed_student(
        &store,
        "654321",
        CredentialRecord::Plaintext {
            value: "legacy-temp".to_string(),
        },
    )
    .await;

    resolver
        .activate_student("654321", "newpass1".to_string())
        .await
        .unwrap();

    let identity = store.find_by_student_id("654321").await.unwrap().unwrap();
    assert_eq!(
        identity.credential,
        CredentialRecord::Plaintext {
            value: "newpass1".to_string()
        }
    );
    assert!(identity.student.unwrap().is_activated);
}

#[tokio::test]
async fn test_providers_cover_their_paths() {
    let (_dir, store) = open_store();

    // Registration through the email provider's action field.
    let email = EmailProvider::new(resolver(&store));
    let claims = email
        .authorize(json!({
            "email": "kid@school.edu",
            "password": "secret1",
            "name": "Kid",
            "action": "register",
        }))
        .await
        .unwrap();
    assert_eq!(claims.role, Role::Student);

    // Default action is login.
    let claims = email
        .authorize(json!({ "email": "kid@school.edu", "password": "secret1" }))
        .await
        .unwrap();
    assert_eq!(claims.email, "kid@school.edu");

    // Student provider rejects an unknown number distinctly.
    let student = StudentIdProvider::new(resolver(&store));
    let err = student
        .authorize(json!({ "studentId": "123456", "password": "secret1" }))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StudentNotFound));

    // Activation provider reports the mismatch on the confirmation field.
    let activation = ActivationProvider::new(resolver(&store));
    let err = activation
        .authorize(json!({
            "studentId": "123456",
            "password": "newpass1",
            "confirmPassword": "newpass2",
        }))
        .await
        .unwrap_err();
    let AppError::Validation(v) = err else {
        panic!("expected a validation failure");
    };
    assert!(v.message_for("confirmPassword").is_some());
}

#[tokio::test]
async fn test_refresh_claims_reflects_the_store() {
    let (_dir, store) = open_store();
    let resolver = resolver(&store);

    let claims = resolver
        .register("a@b.com", "secret1".to_string(), "A")
        .await
        .unwrap();
    let refreshed = resolver.refresh_claims(&claims).await.unwrap();
    assert_eq!(refreshed, claims);
}
