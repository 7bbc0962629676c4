//! Cached HTTP fetcher
//!
//! The core shared by every query adapter: an HTTP GET behind a
//! content-addressed-by-name disk cache with time-based invalidation.
//! JSON payloads are cached as (optionally gzipped) text; opaque blobs are
//! cached verbatim. A corrupt cache file is treated like a miss and
//! overwritten by the next successful fetch.
//!
//! Per-call state machine: a fresh cache entry is decoded and returned; a
//! stale entry is deleted before the network is tried; a network success is
//! written back when caching is enabled; a network failure propagates.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{EvictionPolicy, FetchConfig};

/// Browser-style user agent sent with every request; some upstream services
/// reject the default library identifier.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) \
                          Gecko/20100101 Firefox/109.0";

/// Upper bound on any single network call, so a hung service cannot hang the
/// launcher UI.
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Chunk size for streaming blob downloads to disk
const BLOB_CHUNK_BYTES: usize = 1024 * 1024;

/// Errors from the cached fetch layer
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, bad proxy, or non-2xx response status
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON
    #[error("malformed JSON body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Reading or writing the cache failed
    #[error("cache I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// HTTP GET client with a disk cache in front
///
/// Owns a blocking `reqwest` client configured from a [`FetchConfig`];
/// construct one per invocation and pass it to the adapters. All I/O is
/// synchronous and sequential.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    /// Builds a fetcher from the given configuration
    ///
    /// Fails if the proxy URL is malformed or the HTTP client cannot be
    /// constructed.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT);
        if let Some(proxy) = &config.proxy {
            // Proxy::all covers http and https alike
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    /// The configuration this fetcher was built with
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches a JSON document, served from cache when possible
    ///
    /// Compression of the cache file is inferred from the `.gz` suffix of
    /// `cache_name`; see [`Fetcher::fetch_json_cached_with`] to override.
    ///
    /// # Arguments
    /// * `url` - the URL to request
    /// * `params` - query parameters, URL-encoded on the wire
    /// * `cache_name` - basename of the cache file under the cache directory
    pub fn fetch_json_cached(
        &self,
        url: &str,
        params: &[(&str, &str)],
        cache_name: &str,
    ) -> Result<Value, FetchError> {
        let compressed = cache_name.ends_with(".gz");
        self.fetch_json_cached_with(url, params, cache_name, compressed)
    }

    /// Like [`Fetcher::fetch_json_cached`], with explicit cache compression
    pub fn fetch_json_cached_with(
        &self,
        url: &str,
        params: &[(&str, &str)],
        cache_name: &str,
        compressed: bool,
    ) -> Result<Value, FetchError> {
        let cache_path = self.prepare_cache_entry(cache_name)?;

        if let Some(path) = &cache_path {
            if path.is_file() {
                match read_json_cache(path, compressed) {
                    Ok(value) => {
                        debug!(path = %path.display(), "cache hit");
                        return Ok(value);
                    }
                    Err(err) => {
                        // Corrupt entry: recover by refetching
                        warn!(path = %path.display(), %err, "discarding unreadable cache entry");
                    }
                }
            }
        }

        let body = self.get(url, params)?.error_for_status()?.text()?;
        let value: Value = serde_json::from_str(&body)?;

        if let Some(path) = &cache_path {
            write_json_cache(path, &value, compressed)?;
            debug!(path = %path.display(), "cached fresh response");
        }
        Ok(value)
    }

    /// Downloads an opaque blob through the cache
    ///
    /// Returns the path of the cached file, or `None` when caching is
    /// disabled (a blob download has nowhere to land without a cache
    /// directory, so no network call is made either). The body is streamed
    /// to disk in 1 MiB chunks rather than buffered in memory.
    pub fn fetch_blob_cached(
        &self,
        url: &str,
        params: &[(&str, &str)],
        cache_name: &str,
    ) -> Result<Option<PathBuf>, FetchError> {
        let Some(path) = self.prepare_cache_entry(cache_name)? else {
            return Ok(None);
        };
        if path.is_file() {
            debug!(path = %path.display(), "cache hit");
            return Ok(Some(path));
        }

        let mut response = self.get(url, params)?.error_for_status()?;
        let mut out = File::create(&path)?;
        if let Err(err) = copy_chunked(&mut response, &mut out) {
            // Do not leave a truncated blob behind to be served as a hit
            drop(out);
            let _ = fs::remove_file(&path);
            return Err(err.into());
        }
        Ok(Some(path))
    }

    /// Resolves the cache file path for `cache_name`, evicting stale state
    ///
    /// Returns `None` when caching is disabled. With the eager policy the
    /// whole directory is swept first; with the lazy policy only the
    /// addressed entry is checked. Stale entries are deleted before any
    /// network attempt.
    fn prepare_cache_entry(&self, cache_name: &str) -> Result<Option<PathBuf>, FetchError> {
        let Some(dir) = &self.config.cache_dir else {
            return Ok(None);
        };
        fs::create_dir_all(dir)?;

        if self.config.eviction == EvictionPolicy::Eager {
            if let Some(timeout) = self.config.cache_timeout {
                evict_stale_entries(dir, timeout)?;
            }
        }

        let path = dir.join(cache_name);
        if path.is_file() && self.entry_is_stale(&path)? {
            debug!(path = %path.display(), "removing stale cache entry");
            fs::remove_file(&path)?;
        }
        Ok(Some(path))
    }

    fn entry_is_stale(&self, path: &Path) -> Result<bool, FetchError> {
        // No timeout configured: entries never expire
        let Some(timeout) = self.config.cache_timeout else {
            return Ok(false);
        };
        let mtime = fs::metadata(path)?.modified()?;
        Ok(is_stale(mtime.into(), Utc::now(), timeout))
    }

    fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<Response, FetchError> {
        let mut request = self.client.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }
        Ok(request.send()?)
    }
}

/// Whether an entry written at `mtime` has expired by `now`
///
/// An age exactly equal to the timeout still counts as fresh.
fn is_stale(mtime: DateTime<Utc>, now: DateTime<Utc>, timeout: Duration) -> bool {
    now.signed_duration_since(mtime) > timeout
}

/// Deletes every file in `dir` older than `timeout`
///
/// This is the eager eviction sweep run before a fetch; subdirectories are
/// left alone.
pub fn evict_stale_entries(dir: &Path, timeout: Duration) -> io::Result<()> {
    let now = Utc::now();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        let mtime: DateTime<Utc> = metadata.modified()?.into();
        if is_stale(mtime, now, timeout) {
            debug!(path = %entry.path().display(), "evicting stale cache entry");
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

fn read_json_cache(path: &Path, compressed: bool) -> Result<Value, FetchError> {
    let file = File::open(path)?;
    let value = if compressed {
        serde_json::from_reader(GzDecoder::new(file))?
    } else {
        serde_json::from_reader(io::BufReader::new(file))?
    };
    Ok(value)
}

fn write_json_cache(path: &Path, value: &Value, compressed: bool) -> Result<(), FetchError> {
    if compressed {
        let mut encoder = GzEncoder::new(File::create(path)?, Compression::default());
        serde_json::to_writer(&mut encoder, value)?;
        encoder.finish()?;
    } else {
        serde_json::to_writer(File::create(path)?, value)?;
    }
    Ok(())
}

fn copy_chunked<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    let mut buf = vec![0u8; BLOB_CHUNK_BYTES];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }
    Ok(total)
}
