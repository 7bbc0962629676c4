//! Merriam-Webster collegiate dictionary adapter
//!
//! Looks a word up via the dictionaryapi.com v3 collegiate endpoint, reduces
//! each entry to the fields the launcher items need, and downloads
//! pronunciation audio through the blob cache. When the word is unknown the
//! API returns a plain list of suggested spellings instead of entry objects;
//! that case is surfaced as [`DictionaryResult::NoMatch`] rather than an
//! error.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::encode_path_segment;
use crate::cache::{hashed_key, sanitize_key, Fetcher};
use crate::error::QueryError;
use crate::output::{self, Item, ModAction, Mods, Text};

const DICTIONARY_API_BASE: &str = "https://dictionaryapi.com/api/v3/references/collegiate/json";
const DICTIONARY_WEB_BASE: &str = "https://www.merriam-webster.com/dictionary";
const MEDIA_BASE: &str = "https://media.merriam-webster.com/audio/prons/en/us/mp3";

/// Speaker mark appended to titles of entries with local pronunciation audio
const SPEAKER_MARK: char = '\u{1F508}';

/// Raw API response item: either a full entry or, for unknown words, a bare
/// suggestion string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiItem {
    Entry(ApiEntry),
    Suggestion(String),
}

#[derive(Debug, Deserialize)]
struct ApiEntry {
    meta: ApiMeta,
    hwi: ApiHeadword,
    #[serde(default)]
    fl: Option<String>,
    #[serde(default)]
    shortdef: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMeta {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiHeadword {
    hw: String,
    #[serde(default)]
    prs: Vec<ApiPronunciation>,
}

#[derive(Debug, Deserialize)]
struct ApiPronunciation {
    #[serde(default)]
    sound: Option<ApiSound>,
}

#[derive(Debug, Deserialize)]
struct ApiSound {
    audio: String,
}

/// A dictionary entry reduced to what the launcher items need
#[derive(Debug, Clone, PartialEq)]
pub struct WordEntry {
    pub uid: String,
    pub word: String,
    pub functional_label: String,
    pub audio_url: Option<String>,
    pub short_definitions: String,
    pub web_url: String,
}

/// Outcome of a dictionary lookup
#[derive(Debug)]
pub enum DictionaryResult {
    Entries(Vec<WordEntry>),
    /// The word is unknown; the payload lists suggested spellings (possibly
    /// empty)
    NoMatch(Vec<String>),
}

/// Client for the Merriam-Webster collegiate dictionary API
#[derive(Debug, Clone)]
pub struct DictionaryClient {
    base_url: String,
    web_base_url: String,
    media_base_url: String,
}

impl DictionaryClient {
    pub fn new() -> Self {
        Self {
            base_url: DICTIONARY_API_BASE.to_string(),
            web_base_url: DICTIONARY_WEB_BASE.to_string(),
            media_base_url: MEDIA_BASE.to_string(),
        }
    }

    /// Creates a client pointed at custom base URLs (for testing)
    pub fn with_base_urls(
        base_url: impl Into<String>,
        web_base_url: impl Into<String>,
        media_base_url: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            web_base_url: web_base_url.into(),
            media_base_url: media_base_url.into(),
        }
    }

    /// Produces the launcher items for `word`, audio included
    ///
    /// Checks the API key up front, then looks the word up and downloads
    /// pronunciation audio for each entry through the blob cache. With
    /// caching disabled the audio has nowhere to land, so the pronounce
    /// modifier is omitted from those items.
    pub fn query(
        &self,
        fetcher: &Fetcher,
        api_key: Option<&str>,
        word: &str,
    ) -> Result<Vec<Item>, QueryError> {
        let api_key = api_key.ok_or(QueryError::MissingApiKey)?;
        match self.lookup(fetcher, api_key, word)? {
            DictionaryResult::NoMatch(suggestions) => Ok(output::no_such_word_items(&suggestions)),
            DictionaryResult::Entries(entries) => {
                let mut items = Vec::with_capacity(entries.len());
                for entry in &entries {
                    let audio_path = match &entry.audio_url {
                        Some(url) => self.fetch_audio(fetcher, url)?,
                        None => None,
                    };
                    items.push(entry_item(entry, audio_path.as_deref()));
                }
                Ok(items)
            }
        }
    }

    /// Fetches and parses the raw lookup response
    pub fn lookup(
        &self,
        fetcher: &Fetcher,
        api_key: &str,
        word: &str,
    ) -> Result<DictionaryResult, QueryError> {
        let url = format!("{}/{}", self.base_url, encode_path_segment(word));
        let cache_name = format!("mw_{}.json.gz", hashed_key(word));
        let value = fetcher.fetch_json_cached(&url, &[("key", api_key)], &cache_name)?;

        let api_items: Vec<ApiItem> =
            serde_json::from_value(value).map_err(|err| QueryError::UnexpectedResponse {
                service: "dictionary",
                detail: err.to_string(),
            })?;

        let mut entries = Vec::new();
        let mut suggestions = Vec::new();
        for item in api_items {
            match item {
                ApiItem::Entry(entry) => entries.push(self.reduce_entry(entry)),
                ApiItem::Suggestion(candidate) => suggestions.push(candidate),
            }
        }
        if entries.is_empty() {
            return Ok(DictionaryResult::NoMatch(suggestions));
        }
        Ok(DictionaryResult::Entries(entries))
    }

    /// Downloads pronunciation audio through the cache, returning the local
    /// path, or `None` when caching is disabled
    pub fn fetch_audio(
        &self,
        fetcher: &Fetcher,
        audio_url: &str,
    ) -> Result<Option<PathBuf>, QueryError> {
        let basename = audio_url.rsplit('/').next().unwrap_or(audio_url);
        let cache_name = format!("mw_{}", sanitize_key(basename));
        Ok(fetcher.fetch_blob_cached(audio_url, &[], &cache_name)?)
    }

    fn reduce_entry(&self, entry: ApiEntry) -> WordEntry {
        let audio_url = entry
            .hwi
            .prs
            .iter()
            .filter_map(|prs| prs.sound.as_ref())
            .filter_map(|sound| self.audio_url(&sound.audio))
            .next();
        let short_definitions: String = entry
            .shortdef
            .iter()
            .enumerate()
            .map(|(i, def)| format!("{}. {}; ", i + 1, def))
            .collect();

        WordEntry {
            uid: entry.meta.id,
            web_url: format!(
                "{}/{}",
                self.web_base_url,
                encode_path_segment(&entry.hwi.hw)
            ),
            word: entry.hwi.hw,
            functional_label: entry.fl.unwrap_or_else(|| "??".to_string()),
            audio_url,
            short_definitions,
        }
    }

    /// Maps an audio basename to its media URL
    ///
    /// The hosting subdirectory is derived from the basename as the API
    /// documents: literal prefixes `bix` and `gg` name their own
    /// subdirectories, a leading digit or underscore maps to `number`, and
    /// anything else maps to its first character.
    fn audio_url(&self, name: &str) -> Option<String> {
        let first = name.chars().next()?;
        let subdir = if name.starts_with("bix") {
            "bix"
        } else if name.starts_with("gg") {
            "gg"
        } else if first.is_ascii_digit() || first == '_' {
            "number"
        } else {
            &name[..first.len_utf8()]
        };
        Some(format!("{}/{}/{}.mp3", self.media_base_url, subdir, name))
    }
}

impl Default for DictionaryClient {
    fn default() -> Self {
        Self::new()
    }
}

fn entry_item(entry: &WordEntry, audio_path: Option<&Path>) -> Item {
    let title = match audio_path {
        Some(_) => format!(
            "{} ({}) {}",
            entry.word, entry.functional_label, SPEAKER_MARK
        ),
        None => format!("{} ({})", entry.word, entry.functional_label),
    };
    let cmd = match audio_path {
        Some(path) => ModAction {
            subtitle: "Pronounce aloud".to_string(),
            arg: path.display().to_string(),
        },
        None => ModAction {
            subtitle: entry.short_definitions.clone(),
            arg: String::new(),
        },
    };

    let mut item = Item::new(title);
    item.uid = Some(entry.uid.clone());
    item.subtitle = Some(entry.short_definitions.clone());
    item.arg = Some(entry.web_url.clone());
    item.mods = Some(Mods { cmd });
    item.text = Some(Text {
        // Headwords mark syllable breaks with '*'; strip them for copying
        copy: Some(entry.word.replace('*', "")),
        largetype: Some(entry.short_definitions.clone()),
    });
    item
}
