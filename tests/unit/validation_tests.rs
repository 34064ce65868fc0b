use saberpro_backend_lib::validation::{
    validate_activation_credentials, validate_email_credentials, validate_student_id_credentials,
    validate_student_id_format,
};
use saberpro_common::{ActivationCredentials, EmailCredentials, StudentIdCredentials};

#[test]
fn test_email_credentials_enumerate_every_bad_field() {
    let creds = EmailCredentials {
        email: "not-an-email".to_string(),
        password: "x".to_string(),
        name: None,
        action: None,
        source: None,
    };
    let err = validate_email_credentials(&creds).unwrap_err();
    assert_eq!(err.fields.len(), 2);
    assert!(err.message_for("email").is_some());
    assert!(err.message_for("password").is_some());
}

#[test]
fn test_free_form_fields_are_not_validated() {
    let creds = EmailCredentials {
        email: "a@b.com".to_string(),
        password: "secret1".to_string(),
        name: Some("<anything>".to_string()),
        action: Some("login".to_string()),
        source: Some("mobile-app".to_string()),
    };
    assert!(validate_email_credentials(&creds).is_ok());
}

#[test]
fn test_student_id_must_be_six_digits() {
    assert!(validate_student_id_format("123456").is_ok());
    assert!(validate_student_id_format("12345").is_err());
    assert!(validate_student_id_format("123 56").is_err());
    assert!(validate_student_id_format("abcdef").is_err());

    let creds = StudentIdCredentials {
        student_id: "0000001".to_string(),
        password: "secret1".to_string(),
    };
    let err = validate_student_id_credentials(&creds).unwrap_err();
    assert!(err.message_for("studentId").is_some());
}

#[test]
fn test_activation_mismatch_is_attributed_to_confirm_password() {
    let creds = ActivationCredentials {
        student_id: "123456".to_string(),
        password: "newpass1".to_string(),
        confirm_password: "newpass2".to_string(),
    };
    let err = validate_activation_credentials(&creds).unwrap_err();
    assert_eq!(err.fields.len(), 1);
    assert_eq!(err.fields[0].field, "confirmPassword");
}
