//! Google Translate adapter
//!
//! Uses the unofficial gtx endpoint, which returns a deeply nested array
//! where element 0 holds the translated segments. The single result item
//! links to the translate.google.com web UI for the same query.

use serde_json::Value;

use super::encode_query_value;
use crate::cache::{hashed_key, Fetcher};
use crate::error::QueryError;
use crate::output::{Item, ModAction, Mods, Text};

const TRANSLATE_API_BASE: &str = "https://translate.googleapis.com/translate_a/single";
const TRANSLATE_WEB_BASE: &str = "https://translate.google.com";

/// Supported translation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLang {
    English,
    SimplifiedChinese,
}

impl TargetLang {
    /// The wire code for this language
    pub fn code(self) -> &'static str {
        match self {
            TargetLang::English => "en",
            TargetLang::SimplifiedChinese => "zh-CN",
        }
    }

    pub fn parse(code: &str) -> Result<Self, QueryError> {
        match code {
            "en" => Ok(TargetLang::English),
            "zh-CN" => Ok(TargetLang::SimplifiedChinese),
            other => Err(QueryError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Client for the Google Translate gtx endpoint
#[derive(Debug, Clone)]
pub struct TranslateClient {
    base_url: String,
    web_base_url: String,
}

impl TranslateClient {
    pub fn new() -> Self {
        Self {
            base_url: TRANSLATE_API_BASE.to_string(),
            web_base_url: TRANSLATE_WEB_BASE.to_string(),
        }
    }

    /// Creates a client pointed at a custom API base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            web_base_url: TRANSLATE_WEB_BASE.to_string(),
        }
    }

    /// Produces the single launcher item for a translation
    pub fn query(
        &self,
        fetcher: &Fetcher,
        lang: TargetLang,
        query: &str,
    ) -> Result<Vec<Item>, QueryError> {
        let translation = self.translate(fetcher, lang, query)?;
        Ok(vec![self.translation_item(query, lang, &translation)])
    }

    /// Fetches the translation of `query` into `lang`
    pub fn translate(
        &self,
        fetcher: &Fetcher,
        lang: TargetLang,
        query: &str,
    ) -> Result<String, QueryError> {
        let params = [
            ("q", query),
            ("client", "gtx"),
            ("sl", "auto"),
            ("tl", lang.code()),
            ("dt", "t"),
        ];
        let cache_name = format!("gg_{}_{}.json", lang.code(), hashed_key(query));
        let value = fetcher.fetch_json_cached(&self.base_url, &params, &cache_name)?;

        parse_translation(&value).ok_or_else(|| QueryError::UnexpectedResponse {
            service: "translate",
            detail: "missing translated segments".to_string(),
        })
    }

    fn translation_item(&self, query: &str, lang: TargetLang, translation: &str) -> Item {
        let web_url = format!(
            "{}?sl=auto&tl={}&text={}&op=translate",
            self.web_base_url,
            lang.code(),
            encode_query_value(query)
        );
        let mut item = Item::new(translation);
        item.arg = Some(web_url);
        item.text = Some(Text {
            copy: Some(translation.to_string()),
            largetype: Some(translation.to_string()),
        });
        item.mods = Some(Mods {
            cmd: ModAction {
                subtitle: "Pronounce aloud using system voice".to_string(),
                arg: query.to_string(),
            },
        });
        item
    }
}

impl Default for TranslateClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenates the translated segments `resp[0][i][0]`
fn parse_translation(value: &Value) -> Option<String> {
    let segments = value.get(0)?.as_array()?;
    let mut out = String::new();
    for segment in segments {
        out.push_str(segment.get(0)?.as_str()?);
    }
    Some(out)
}
