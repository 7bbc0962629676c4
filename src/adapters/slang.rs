//! Urban Dictionary adapter
//!
//! Fetches slang definitions and ranks them by the lower bound of the
//! Wilson score interval over up/down votes, so a definition with 50/2
//! votes outranks one with 500/400.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::cache::{hashed_key, Fetcher};
use crate::error::QueryError;
use crate::output::{Item, ModAction, Mods, Text};

const URBAN_API_BASE: &str = "https://api.urbandictionary.com/v0/define";

const THUMBS_UP_MARK: char = '\u{25B2}';
const THUMBS_DOWN_MARK: char = '\u{25BC}';

#[derive(Debug, Deserialize)]
struct ApiResponse {
    list: Vec<ApiDefinition>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    word: String,
    thumbs_up: i64,
    thumbs_down: i64,
    definition: String,
    permalink: String,
}

/// A slang definition reduced to what the launcher items need
#[derive(Debug, Clone, PartialEq)]
pub struct SlangEntry {
    pub word: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub definition: String,
    pub permalink: String,
}

/// Client for the Urban Dictionary define API
#[derive(Debug, Clone)]
pub struct SlangClient {
    base_url: String,
}

impl SlangClient {
    pub fn new() -> Self {
        Self {
            base_url: URBAN_API_BASE.to_string(),
        }
    }

    /// Creates a client pointed at a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Produces the launcher items for `term`, best definitions first
    pub fn query(&self, fetcher: &Fetcher, term: &str) -> Result<Vec<Item>, QueryError> {
        let entries = self.lookup(fetcher, term)?;
        Ok(entries.iter().map(entry_item).collect())
    }

    /// Fetches the definitions of `term`, sorted by vote quality
    pub fn lookup(&self, fetcher: &Fetcher, term: &str) -> Result<Vec<SlangEntry>, QueryError> {
        let cache_name = format!("ub_{}.json.gz", hashed_key(term));
        let value = fetcher.fetch_json_cached(&self.base_url, &[("term", term)], &cache_name)?;

        let response: ApiResponse =
            serde_json::from_value(value).map_err(|err| QueryError::UnexpectedResponse {
                service: "slang",
                detail: err.to_string(),
            })?;

        let mut entries: Vec<SlangEntry> = response
            .list
            .into_iter()
            .map(|def| SlangEntry {
                word: def.word,
                upvotes: def.thumbs_up,
                downvotes: def.thumbs_down,
                // Cross-reference brackets are markup, not content
                definition: def.definition.replace(['[', ']'], ""),
                permalink: def.permalink,
            })
            .collect();
        sort_by_score(&mut entries);
        Ok(entries)
    }
}

impl Default for SlangClient {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_by_score(entries: &mut [SlangEntry]) {
    entries.sort_by(|a, b| {
        let score_a = wilson_score_lower_bound(a.upvotes, a.downvotes);
        let score_b = wilson_score_lower_bound(b.upvotes, b.downvotes);
        score_b.partial_cmp(&score_a).unwrap_or(Ordering::Equal)
    });
}

/// Lower bound of the Wilson score interval at 95% confidence (z = 1.96)
pub fn wilson_score_lower_bound(upvotes: i64, downvotes: i64) -> f64 {
    let n = (upvotes + downvotes) as f64;
    if n <= 0.0 {
        return 0.0;
    }
    let p = upvotes as f64 / n;
    let z = 1.96_f64;
    (p + z * z / (2.0 * n) - z * ((p * (1.0 - p) + z * z / (4.0 * n)) / n).sqrt())
        / (1.0 + z * z / n)
}

fn entry_item(entry: &SlangEntry) -> Item {
    let mut item = Item::new(format!(
        "{} | {} {}  {} {}",
        entry.word, THUMBS_UP_MARK, entry.upvotes, THUMBS_DOWN_MARK, entry.downvotes
    ));
    item.subtitle = Some(entry.definition.clone());
    item.arg = Some(entry.permalink.clone());
    item.text = Some(Text {
        copy: Some(entry.word.clone()),
        largetype: Some(entry.definition.clone()),
    });
    item.mods = Some(Mods {
        cmd: ModAction {
            subtitle: "Pronounce aloud using system voice".to_string(),
            arg: entry.word.clone(),
        },
    });
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(word: &str, upvotes: i64, downvotes: i64) -> SlangEntry {
        SlangEntry {
            word: word.to_string(),
            upvotes,
            downvotes,
            definition: format!("definition of {word}"),
            permalink: format!("https://example.com/{word}"),
        }
    }

    #[test]
    fn test_wilson_score_no_votes_is_zero() {
        assert_eq!(wilson_score_lower_bound(0, 0), 0.0);
    }

    #[test]
    fn test_wilson_score_known_value() {
        // One upvote, no downvotes: (1 + z²/2 - z·√(z²/4)) / (1 + z²) ≈ 0.2065
        let score = wilson_score_lower_bound(1, 0);
        assert!((score - 0.2065).abs() < 1e-3, "got {score}");
    }

    #[test]
    fn test_wilson_score_prefers_vote_quality_over_volume() {
        let small_good = wilson_score_lower_bound(50, 2);
        let big_mixed = wilson_score_lower_bound(500, 400);
        assert!(small_good > big_mixed);
    }

    #[test]
    fn test_wilson_score_grows_with_sample_size() {
        // Same 100% approval, more votes, tighter interval
        assert!(wilson_score_lower_bound(100, 0) > wilson_score_lower_bound(1, 0));
    }

    #[test]
    fn test_sort_orders_best_first() {
        let mut entries = vec![entry("meh", 500, 400), entry("good", 50, 2), entry("zero", 0, 0)];
        sort_by_score(&mut entries);
        let order: Vec<&str> = entries.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(order, ["good", "meh", "zero"]);
    }

    #[test]
    fn test_parse_api_response_strips_brackets() {
        let value = json!({
            "list": [{
                "word": "rizz",
                "thumbs_up": 120,
                "thumbs_down": 8,
                "definition": "Short for [charisma].",
                "permalink": "https://example.com/rizz"
            }]
        });
        let response: ApiResponse = serde_json::from_value(value).expect("Failed to parse");
        let stripped = response.list[0].definition.replace(['[', ']'], "");
        assert_eq!(stripped, "Short for charisma.");
    }

    #[test]
    fn test_entry_item_shape() {
        let item = entry_item(&entry("rizz", 120, 8));

        assert_eq!(
            item.title,
            format!("rizz | {THUMBS_UP_MARK} 120  {THUMBS_DOWN_MARK} 8")
        );
        assert_eq!(item.subtitle.as_deref(), Some("definition of rizz"));
        assert_eq!(item.arg.as_deref(), Some("https://example.com/rizz"));
        let mods = item.mods.expect("Modifier expected");
        assert_eq!(mods.cmd.arg, "rizz");
    }
}
