use saberpro_backend_lib::auth::password::{
    hash_password, verify_credential, CredentialRecord, MIN_ITERATIONS,
};

#[test]
fn test_verify_accepts_what_hash_produced() {
    for password in ["secret1", "pässwörd", "", "a very long password indeed 1234567890"] {
        let record = hash_password(password, MIN_ITERATIONS);
        assert!(verify_credential(&record, password), "password {password:?}");
    }
}

#[test]
fn test_verify_rejects_other_passwords() {
    let record = hash_password("secret1", MIN_ITERATIONS);
    for wrong in ["secret2", "Secret1", "secret1 ", ""] {
        assert!(!verify_credential(&record, wrong), "wrong {wrong:?}");
    }
}

#[test]
fn test_repeated_hashing_never_repeats_salts() {
    let salts: Vec<String> = (0..8)
        .map(|_| match hash_password("secret1", MIN_ITERATIONS) {
            CredentialRecord::Hashed { salt, .. } => salt,
            CredentialRecord::Plaintext { .. } => panic!("expected hashed record"),
        })
        .collect();

    for (i, a) in salts.iter().enumerate() {
        for b in &salts[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_cross_verification_fails() {
    let a = hash_password("password-a", MIN_ITERATIONS);
    let b = hash_password("password-b", MIN_ITERATIONS);
    assert!(!verify_credential(&a, "password-b"));
    assert!(!verify_credential(&b, "password-a"));
}
