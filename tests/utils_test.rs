use spotstats::error::AuthError;
use spotstats::utils::*;

const UNRESERVED: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier(DEFAULT_VERIFIER_LEN).unwrap();

    // Should be exactly the requested length
    assert_eq!(verifier.len(), 64);

    // Should contain only unreserved characters
    assert!(verifier.chars().all(|c| UNRESERVED.contains(c)));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier(DEFAULT_VERIFIER_LEN).unwrap();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_verifier_bounds() {
    assert_eq!(generate_code_verifier(43).unwrap().len(), 43);
    assert_eq!(generate_code_verifier(128).unwrap().len(), 128);

    assert!(matches!(
        generate_code_verifier(42),
        Err(AuthError::InvalidVerifierLength(42))
    ));
    assert!(matches!(
        generate_code_verifier(129),
        Err(AuthError::InvalidVerifierLength(129))
    ));
}

#[test]
fn test_generate_code_challenge() {
    // RFC 7636 appendix B
    let challenge = generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
    assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");

    // Should be deterministic - same input produces same output
    assert_eq!(
        generate_code_challenge("test_verifier_123"),
        generate_code_challenge("test_verifier_123")
    );

    // Different input should produce different output
    assert_ne!(
        generate_code_challenge("test_verifier_123"),
        generate_code_challenge("different_verifier")
    );
}

#[test]
fn test_code_challenge_is_url_safe_for_every_length() {
    for len in MIN_VERIFIER_LEN..=MAX_VERIFIER_LEN {
        let verifier = generate_code_verifier(len).unwrap();
        let challenge = generate_code_challenge(&verifier);

        // 32 byte digest without padding
        assert_eq!(challenge.len(), 43);
        assert!(
            !challenge.contains(['+', '/', '=']),
            "challenge {challenge} for length {len} is not base64url"
        );
    }
}

#[test]
fn test_hours() {
    assert_eq!(hours(0), "0.00 h");
    assert_eq!(hours(5_400_000), "1.50 h");
    assert_eq!(hours(3_600_000 * 12 + 60_000 * 45), "12.75 h");
    assert!((ms_to_hours(1_800_000) - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_now_ms_is_epoch_millis() {
    let now = now_ms();

    // 2020-01-01 in epoch milliseconds
    assert!(now > 1_577_836_800_000);
    assert!(now_ms() >= now);
}
