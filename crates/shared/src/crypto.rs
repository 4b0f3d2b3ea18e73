//! Hashing helpers for secrets stored at rest.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hashes a one-time code together with the mobile it was issued to.
///
/// Binding the mobile into the digest means a leaked row cannot be replayed
/// against another number.
pub fn otp_digest(mobile: &str, code: &str) -> String {
    sha256_hex(&format!("{}:{}", mobile, code))
}
