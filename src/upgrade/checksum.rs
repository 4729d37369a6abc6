//! SHA-256 verification of downloaded release binaries

use sha2::{Digest, Sha256};

use crate::error::{AkamaiError, Result};

/// Lowercase hex SHA-256 of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Check `data` against the hex digest published in a `.sig` file.
///
/// Surrounding whitespace and letter case in the signature are ignored.
pub fn verify(data: &[u8], signature: &str) -> Result<()> {
    let expected = signature.trim().to_lowercase();
    let decoded = hex::decode(&expected).map_err(|e| AkamaiError::UpgradeFailed {
        reason: format!("invalid checksum signature: {e}"),
    })?;

    let actual = Sha256::digest(data);
    if decoded.as_slice() == actual.as_slice() {
        Ok(())
    } else {
        Err(AkamaiError::ChecksumMismatch {
            expected,
            actual: hex::encode(actual),
        })
    }
}
