//! Launcher response model
//!
//! The JSON document written to stdout: an `items` array of display records
//! plus an optional `variables` object. Also hosts the catch-all rendering
//! of errors and of the "no such word" item set, so adapter failures surface
//! as a selectable-looking row instead of a crash.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::QueryError;

/// Icon shown on error and no-match rows
pub const ERROR_ICON: &str = "error-icon.png";

/// Copy/largetype text attached to an item
#[derive(Debug, Clone, Default, Serialize)]
pub struct Text {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largetype: Option<String>,
}

/// Behavior of an item while a modifier key is held
#[derive(Debug, Clone, Serialize)]
pub struct ModAction {
    pub subtitle: String,
    pub arg: String,
}

/// Modifier-key actions; only cmd is used
#[derive(Debug, Clone, Serialize)]
pub struct Mods {
    pub cmd: ModAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct Icon {
    pub path: String,
}

/// A single display record
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mods: Option<Mods>,
}

impl Item {
    /// A minimal item with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            uid: None,
            title: title.into(),
            subtitle: None,
            arg: None,
            valid: None,
            icon: None,
            text: None,
            mods: None,
        }
    }
}

/// The complete response document
#[derive(Debug, Serialize)]
pub struct Response {
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
}

impl Response {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            variables: None,
        }
    }

    pub fn with_variables(items: Vec<Item>, variables: Option<Map<String, Value>>) -> Self {
        Self { items, variables }
    }

    /// Renders an error as a single non-selectable item
    pub fn from_error(err: &QueryError) -> Self {
        let mut item = Item::new(format!("Error occurs: {}", err.kind()));
        item.subtitle = Some(format!("Message: {err}"));
        item.valid = Some(false);
        item.icon = Some(Icon {
            path: ERROR_ICON.to_string(),
        });
        Self::new(vec![item])
    }
}

/// Items shown when the dictionary has no entry for the query
///
/// Suggested spellings, when the upstream offers any, are listed below the
/// header as non-selectable rows whose text can still be copied.
pub fn no_such_word_items(candidates: &[String]) -> Vec<Item> {
    let mut header = if candidates.is_empty() {
        Item::new("No such word!")
    } else {
        let mut item = Item::new("No such word! Do you mean one of:");
        item.subtitle = Some("Select one word and command+c to copy".to_string());
        item
    };
    header.valid = Some(false);
    header.icon = Some(Icon {
        path: ERROR_ICON.to_string(),
    });

    let mut items = vec![header];
    for word in candidates {
        let mut item = Item::new(word.clone());
        item.valid = Some(false);
        item.text = Some(Text {
            copy: Some(word.clone()),
            largetype: None,
        });
        items.push(item);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_item_serializes_title_only() {
        let item = Item::new("hello");
        let json = serde_json::to_value(&item).expect("Failed to serialize Item");
        assert_eq!(json, serde_json::json!({"title": "hello"}));
    }

    #[test]
    fn test_full_item_serializes_all_fields() {
        let mut item = Item::new("word (noun)");
        item.uid = Some("word:1".to_string());
        item.subtitle = Some("1. a thing; ".to_string());
        item.arg = Some("https://example.com/word".to_string());
        item.text = Some(Text {
            copy: Some("word".to_string()),
            largetype: Some("1. a thing; ".to_string()),
        });
        item.mods = Some(Mods {
            cmd: ModAction {
                subtitle: "Pronounce aloud".to_string(),
                arg: "/tmp/word.mp3".to_string(),
            },
        });

        let json = serde_json::to_value(&item).expect("Failed to serialize Item");
        assert_eq!(json["uid"], "word:1");
        assert_eq!(json["mods"]["cmd"]["arg"], "/tmp/word.mp3");
        assert_eq!(json["text"]["copy"], "word");
        assert!(json.get("valid").is_none(), "Unset fields should be omitted");
        assert!(json.get("icon").is_none(), "Unset fields should be omitted");
    }

    #[test]
    fn test_response_omits_absent_variables() {
        let response = Response::new(vec![]);
        let json = serde_json::to_value(&response).expect("Failed to serialize Response");
        assert_eq!(json, serde_json::json!({"items": []}));
    }

    #[test]
    fn test_response_includes_variables_when_present() {
        let mut variables = Map::new();
        variables.insert("lang".to_string(), Value::String("en".to_string()));
        let response = Response::with_variables(vec![], Some(variables));

        let json = serde_json::to_value(&response).expect("Failed to serialize Response");
        assert_eq!(json["variables"]["lang"], "en");
    }

    #[test]
    fn test_error_response_shape() {
        let err = QueryError::MissingApiKey;
        let response = Response::from_error(&err);

        assert_eq!(response.items.len(), 1);
        let item = &response.items[0];
        assert_eq!(item.title, "Error occurs: MissingCredential");
        assert!(item
            .subtitle
            .as_deref()
            .expect("Error item should have a subtitle")
            .starts_with("Message: "));
        assert_eq!(item.valid, Some(false));
        assert_eq!(
            item.icon.as_ref().map(|icon| icon.path.as_str()),
            Some(ERROR_ICON)
        );
    }

    #[test]
    fn test_no_such_word_without_candidates() {
        let items = no_such_word_items(&[]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "No such word!");
        assert!(items[0].subtitle.is_none());
        assert_eq!(items[0].valid, Some(false));
    }

    #[test]
    fn test_no_such_word_lists_candidates() {
        let candidates = vec!["hallo".to_string(), "hollow".to_string()];
        let items = no_such_word_items(&candidates);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "No such word! Do you mean one of:");
        assert_eq!(items[1].title, "hallo");
        assert_eq!(items[1].valid, Some(false));
        assert_eq!(
            items[2].text.as_ref().and_then(|t| t.copy.as_deref()),
            Some("hollow")
        );
    }
}
