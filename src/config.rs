//! Configuration for the cached fetch layer
//!
//! All configuration is read once at the process boundary (environment
//! variables, CLI flags) and carried as plain values from there on, so the
//! fetch layer itself never touches the environment and stays deterministic
//! under test.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use directories::{BaseDirs, ProjectDirs};
use thiserror::Error;

/// Errors arising from bad or missing configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The cache timeout string could not be parsed
    #[error("invalid cache timeout value \"{0}\"")]
    InvalidTimeout(String),

    /// The eviction policy string was neither "lazy" nor "eager"
    #[error("invalid cache eviction policy \"{0}\", expected \"lazy\" or \"eager\"")]
    InvalidEviction(String),

    /// The configured cache path exists but is not a directory
    #[error("cache path \"{}\" exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The cache directory could not be created or resolved
    #[error("cache directory \"{}\" is unavailable: {source}", .path.display())]
    CacheDirUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No platform cache directory could be determined
    #[error("no platform cache directory could be determined")]
    NoDefaultCacheDir,
}

/// When stale cache entries are deleted
///
/// `Lazy` deletes a stale entry when a fetch encounters it; `Eager` sweeps
/// the whole cache directory before each fetch. The two policies match the
/// two original workflow families and are unified here as configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    #[default]
    Lazy,
    Eager,
}

/// Per-call configuration for the cached fetcher
///
/// Passed by value into `Fetcher::new`; there is no shared mutable state
/// across calls other than the cache directory itself.
#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    /// Cache root; `None` disables caching entirely
    pub cache_dir: Option<PathBuf>,
    /// Entry lifetime; `None` means entries never expire
    pub cache_timeout: Option<Duration>,
    /// Proxy URL applied to both http and https
    pub proxy: Option<String>,
    /// When stale entries are removed
    pub eviction: EvictionPolicy,
}

/// Raw settings gathered from the process environment
///
/// Variable names follow the original workflow configuration: `cachedir`,
/// `cache_timeout`, `proxy`, `mw_api_key`, plus `cache_eviction` for the
/// eviction policy. Empty values are treated as unset.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub cache_dir: Option<PathBuf>,
    pub cache_timeout: Option<Duration>,
    pub proxy: Option<String>,
    pub mw_api_key: Option<String>,
    pub eviction: EvictionPolicy,
}

impl Settings {
    /// Reads settings from the process environment
    ///
    /// # Returns
    /// * `Ok(Settings)` with unset variables mapped to `None`
    /// * `Err(ConfigError)` if `cache_timeout` or `cache_eviction` is set
    ///   but malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        fn var(name: &str) -> Option<String> {
            env::var(name).ok().filter(|value| !value.is_empty())
        }

        let cache_timeout = var("cache_timeout")
            .map(|raw| parse_cache_timeout(&raw))
            .transpose()?;
        let eviction = var("cache_eviction")
            .map(|raw| parse_eviction_policy(&raw))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            cache_dir: var("cachedir").map(PathBuf::from),
            cache_timeout,
            proxy: var("proxy"),
            mw_api_key: var("mw_api_key"),
            eviction,
        })
    }
}

/// Parses a cache timeout string into a duration
///
/// Accepts plain integer seconds ("86400") or `<number><unit>` with unit in
/// {w, d, h, m, s} and optional whitespace before the unit ("1d", "30 m").
/// Anything else is rejected, including trailing garbage.
pub fn parse_cache_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidTimeout(raw.to_string());
    let trimmed = raw.trim();

    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, rest) = trimmed.split_at(digits_end);
    if digits.is_empty() {
        return Err(invalid());
    }
    let value: i64 = digits.parse().map_err(|_| invalid())?;

    let unit_secs = match rest.trim_start() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 3600 * 24,
        "w" => 3600 * 24 * 7,
        _ => return Err(invalid()),
    };

    let secs = value.checked_mul(unit_secs).ok_or_else(invalid)?;
    Duration::try_seconds(secs).ok_or_else(invalid)
}

fn parse_eviction_policy(raw: &str) -> Result<EvictionPolicy, ConfigError> {
    match raw {
        "lazy" => Ok(EvictionPolicy::Lazy),
        "eager" => Ok(EvictionPolicy::Eager),
        other => Err(ConfigError::InvalidEviction(other.to_string())),
    }
}

/// Resolves a configured cache path to a usable absolute directory
///
/// A leading `~` is expanded to the home directory and the directory is
/// created if missing. A path that exists as something other than a
/// directory is an error.
pub fn resolve_cache_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_home(path);
    if expanded.exists() && !expanded.is_dir() {
        return Err(ConfigError::NotADirectory(expanded));
    }
    fs::create_dir_all(&expanded).map_err(|source| ConfigError::CacheDirUnavailable {
        path: expanded.clone(),
        source,
    })?;
    fs::canonicalize(&expanded).map_err(|source| ConfigError::CacheDirUnavailable {
        path: expanded,
        source,
    })
}

/// Returns the platform cache directory for this tool
///
/// Used by the `--cache` flag when no explicit cache directory is given
/// (`~/.cache/lexifetch` on Linux, the equivalent elsewhere).
pub fn default_cache_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("", "", "lexifetch")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .ok_or(ConfigError::NoDefaultCacheDir)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(base) = BaseDirs::new() {
            return base.home_dir().join(rest);
        }
    }
    path.to_path_buf()
}
