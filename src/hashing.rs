use sha2::{Digest, Sha256};

use crate::error::DownloadError;

pub fn digest(payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

/// Compares the payload digest against an expected hex digest
/// (case-insensitive). Returns the computed digest on match.
pub fn verify(expected: &str, payload: &[u8]) -> Result<String, DownloadError> {
    let actual = digest(payload);
    if !expected.eq_ignore_ascii_case(&actual) {
        return Err(DownloadError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(actual)
}
