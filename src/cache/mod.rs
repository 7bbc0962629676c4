//! Cached web-fetch layer shared by all query adapters
//!
//! A generic content-addressed-by-name disk cache in front of an HTTP GET,
//! with compressed and uncompressed variants, mtime-based expiry, and
//! graceful fallback to the network on miss or corruption. The adapters only
//! ever touch two operations: `Fetcher::fetch_json_cached` and
//! `Fetcher::fetch_blob_cached`.

mod fetcher;
mod keys;

pub use fetcher::{evict_stale_entries, FetchError, Fetcher};
pub use keys::{hashed_key, sanitize_key};
