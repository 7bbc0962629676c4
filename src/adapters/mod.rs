//! Per-service query adapters
//!
//! Each adapter translates one third-party API response into launcher
//! display items, going through the shared cached fetcher for all network
//! access. The clients hold their base URLs so tests can point them at a
//! local server.

pub mod dictionary;
pub mod slang;
pub mod translate;

pub use dictionary::{DictionaryClient, DictionaryResult, WordEntry};
pub use slang::{SlangClient, SlangEntry};
pub use translate::{TargetLang, TranslateClient};

/// Percent-encodes a URL path segment; RFC 3986 unreserved characters pass
/// through untouched.
pub(crate) fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

/// Percent-encodes a query-string value
pub(crate) fn encode_query_value(value: &str) -> String {
    encode_path_segment(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path_segment_passes_unreserved() {
        assert_eq!(encode_path_segment("hello-world_1.2~x"), "hello-world_1.2~x");
    }

    #[test]
    fn test_encode_path_segment_escapes_reserved() {
        assert_eq!(encode_path_segment("a b"), "a%20b");
        assert_eq!(encode_path_segment("a/b"), "a%2Fb");
        assert_eq!(encode_path_segment("café"), "caf%C3%A9");
        assert_eq!(encode_path_segment("50%"), "50%25");
    }

    #[test]
    fn test_encode_query_value_matches_path_rules() {
        assert_eq!(encode_query_value("ni hao"), "ni%20hao");
    }
}
