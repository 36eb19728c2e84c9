use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::error::{AuthError, AuthResult};

/// Unreserved URI characters allowed in a PKCE verifier.
const VERIFIER_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

pub const DEFAULT_VERIFIER_LEN: usize = 64;
pub const MIN_VERIFIER_LEN: usize = 43;
pub const MAX_VERIFIER_LEN: usize = 128;

/// Generates a PKCE code verifier of `len` characters.
///
/// Characters are drawn uniformly from the unreserved set using the
/// thread-local RNG, a CSPRNG reseeded from the operating system.
/// Lengths outside `43..=128` are rejected.
pub fn generate_code_verifier(len: usize) -> AuthResult<String> {
    if !(MIN_VERIFIER_LEN..=MAX_VERIFIER_LEN).contains(&len) {
        return Err(AuthError::InvalidVerifierLength(len));
    }

    let mut rng = rand::rng();
    Ok((0..len)
        .map(|_| VERIFIER_CHARSET[rng.random_range(0..VERIFIER_CHARSET.len())] as char)
        .collect())
}

/// S256 challenge: base64url(SHA-256(verifier)) without padding.
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn ms_to_hours(ms: u64) -> f64 {
    ms as f64 / 3_600_000.0
}

/// Formats a duration in milliseconds as `"1.25 h"`.
pub fn hours(ms: u64) -> String {
    format!("{:.2} h", ms_to_hours(ms))
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
