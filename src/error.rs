//! Top-level error union for query commands
//!
//! Every failure while producing launcher items converges here and is
//! rendered at the boundary as a single error item instead of crashing
//! (see `output::Response::from_error`).

use thiserror::Error;

use crate::cache::FetchError;
use crate::config::ConfigError;

/// Errors that can occur while answering a query
#[derive(Debug, Error)]
pub enum QueryError {
    /// Bad or missing configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Network, HTTP status, or cache I/O failure
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The dictionary adapter needs an API key and none was configured
    #[error("the dictionary is not accessible since no API key is provided")]
    MissingApiKey,

    /// The requested translation target is not supported
    #[error("unsupported target language \"{0}\", expected one of: en, zh-CN")]
    UnsupportedLanguage(String),

    /// The upstream response decoded as JSON but not into the expected shape
    #[error("unexpected {service} response shape: {detail}")]
    UnexpectedResponse {
        service: &'static str,
        detail: String,
    },
}

impl QueryError {
    /// Short kind name shown in the error item title
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Config(_) | QueryError::UnsupportedLanguage(_) => "ConfigError",
            QueryError::Fetch(_) | QueryError::UnexpectedResponse { .. } => "TransportError",
            QueryError::MissingApiKey => "MissingCredential",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let err = QueryError::MissingApiKey;
        assert_eq!(err.kind(), "MissingCredential");

        let err = QueryError::UnsupportedLanguage("fr".to_string());
        assert_eq!(err.kind(), "ConfigError");

        let err = QueryError::UnexpectedResponse {
            service: "dictionary",
            detail: "not an array".to_string(),
        };
        assert_eq!(err.kind(), "TransportError");
    }

    #[test]
    fn test_config_error_converts() {
        let err: QueryError = ConfigError::InvalidTimeout("10x".to_string()).into();
        assert_eq!(err.kind(), "ConfigError");
        assert!(err.to_string().contains("10x"));
    }
}
