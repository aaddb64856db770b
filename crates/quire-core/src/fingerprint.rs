// SPDX-License-Identifier: MIT
//
// Document fingerprinting — SHA-256 hashing for source provenance.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
///
/// Used to fingerprint source documents at load time so that log lines and
/// output filenames can name a document independently of its path.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
