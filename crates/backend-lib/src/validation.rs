// ============================
// crates/backend-lib/src/validation.rs
// ============================
//! Credential payload validation.
//!
//! Every check here is pure and runs before any store access. Failures
//! enumerate per-field messages so the form layer can render them next to
//! the offending input.

use regex::Regex;
use saberpro_common::{ActivationCredentials, EmailCredentials, StudentIdCredentials};
use serde::Serialize;
use std::sync::LazyLock;

// Common validation constants
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const STUDENT_ID_LENGTH: usize = 6;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_NAME_LENGTH: usize = 100;

// Regex patterns for validation
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());
static STUDENT_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

/// A single field violation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Schema violation carrying one message per offending field.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(fields: Vec<FieldError>) -> Self {
        Self { fields }
    }

    /// First message for a given field, if that field failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.message.as_str())
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for field in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field.field, field.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation operations
pub type ValidationResult = Result<(), ValidationError>;

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email address cannot be empty"));
    } else if email.len() > MAX_EMAIL_LENGTH {
        errors.push(FieldError::new(
            "email",
            format!("Email address cannot exceed {MAX_EMAIL_LENGTH} characters"),
        ));
    } else if !EMAIL_REGEX.is_match(email) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }
}

fn check_password(password: &str, field: &'static str, errors: &mut Vec<FieldError>) {
    if password.len() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            field,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    } else if password.len() > MAX_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            field,
            format!("Password cannot exceed {MAX_PASSWORD_LENGTH} characters"),
        ));
    }
}

fn check_student_id(student_id: &str, errors: &mut Vec<FieldError>) {
    if !STUDENT_ID_REGEX.is_match(student_id) {
        errors.push(FieldError::new(
            "studentId",
            format!("Student ID must be exactly {STUDENT_ID_LENGTH} digits"),
        ));
    }
}

/// Validate a bare student number, used by the pre-login student check.
pub fn validate_student_id_format(student_id: &str) -> ValidationResult {
    let mut errors = Vec::new();
    check_student_id(student_id, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

/// Validate an email/password payload (login or registration).
///
/// `name`, `action` and `source` are free-form; only registration requires
/// a name, and that requirement is enforced here when the payload says so.
pub fn validate_email_credentials(creds: &EmailCredentials) -> ValidationResult {
    let mut errors = Vec::new();

    check_email(&creds.email, &mut errors);
    check_password(&creds.password, "password", &mut errors);

    if creds.action.as_deref() == Some("register") {
        let name_ok = creds.name.as_deref().is_some_and(|n| !n.trim().is_empty());
        if !name_ok {
            errors.push(FieldError::new("name", "Name is required to register"));
        } else if creds.name.as_deref().unwrap_or("").len() > MAX_NAME_LENGTH {
            errors.push(FieldError::new(
                "name",
                format!("Name cannot exceed {MAX_NAME_LENGTH} characters"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

/// Validate a student-number login payload.
pub fn validate_student_id_credentials(creds: &StudentIdCredentials) -> ValidationResult {
    let mut errors = Vec::new();

    check_student_id(&creds.student_id, &mut errors);
    check_password(&creds.password, "password", &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

/// Validate an activation payload. A password/confirmation mismatch is
/// attributed to `confirmPassword`, not `password`.
pub fn validate_activation_credentials(creds: &ActivationCredentials) -> ValidationResult {
    let mut errors = Vec::new();

    check_student_id(&creds.student_id, &mut errors);
    check_password(&creds.password, "password", &mut errors);

    if creds.password != creds.confirm_password {
        errors.push(FieldError::new("confirmPassword", "Passwords do not match"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}
