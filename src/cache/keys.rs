//! Cache key derivation
//!
//! Maps arbitrary logical keys (search queries, URL basenames) to
//! filesystem-safe cache file names. Short, mostly-alphanumeric keys can go
//! through `sanitize_key`; anything that may contain arbitrary characters or
//! be arbitrarily long should use `hashed_key`.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

/// Hex characters kept from the digest; 48 bits is plenty for a per-user
/// cache directory.
const HASHED_KEY_LEN: usize = 12;

/// Replaces path-unsafe characters (`:`, `/`, `\`) with `_`
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            ':' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

/// Returns the first 12 hex characters of the SHA-256 digest of `key`
pub fn hashed_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let mut hex = String::with_capacity(HASHED_KEY_LEN);
    for byte in digest.iter().take(HASHED_KEY_LEN.div_ceil(2)) {
        let _ = write!(hex, "{byte:02x}");
    }
    hex.truncate(HASHED_KEY_LEN);
    hex
}
