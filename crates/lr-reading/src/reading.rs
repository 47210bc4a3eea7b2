//! Structured readings and parsing of provider output.

use serde::Deserialize;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{AdapterError, AdapterResult};
use crate::language::Language;

const FALLBACK_SUMMARY: &str = "The reading could not be generated right now.";
const FALLBACK_STORY: &str = "The cards have been drawn, but the reader is unavailable at the \
moment. Look over the cards and their positions, and try again in a little while for a full reading.";
const FALLBACK_ACTIONS: [&str; 3] = [
    "Take a moment to reflect on the cards you drew.",
    "Note which position speaks to your question most clearly.",
    "Ask again later for a complete reading.",
];

/// A reading in one language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reading {
    /// One or two sentence summary.
    pub summary: String,
    /// The narrative across all positions.
    pub overall_story: String,
    /// Practical next steps, in order.
    pub action_items: Vec<String>,
}

impl Reading {
    /// The placeholder reading returned when the provider fails.
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_string(),
            overall_story: FALLBACK_STORY.to_string(),
            action_items: FALLBACK_ACTIONS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Returns true if this is the fallback reading.
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }

    /// Tag this reading with its language for serialization.
    pub fn localized(self, language: Language) -> LocalizedReading {
        LocalizedReading {
            language,
            reading: self,
        }
    }
}

/// A reading that serializes with language-suffixed keys, e.g.
/// `{"summary_ko": ..., "overall_story_ko": ..., "action_items_ko": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedReading {
    /// Language the reading is written in.
    pub language: Language,
    /// The reading itself.
    pub reading: Reading,
}

impl Serialize for LocalizedReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let code = self.language.code();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(&format!("summary_{code}"), &self.reading.summary)?;
        map.serialize_entry(&format!("overall_story_{code}"), &self.reading.overall_story)?;
        map.serialize_entry(&format!("action_items_{code}"), &self.reading.action_items)?;
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ActionItems {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct RawReading {
    #[serde(alias = "summary_en")]
    summary: String,
    #[serde(alias = "overall_story_en")]
    overall_story: String,
    #[serde(default, alias = "action_items_en")]
    action_items: Option<ActionItems>,
}

/// Parse provider output into a reading.
///
/// Accepts JSON optionally wrapped in a fenced code block, with either bare
/// (`summary`) or English-suffixed (`summary_en`) keys. A single string in
/// `action_items` becomes a one-element list. Unknown keys are ignored.
pub fn parse_reading(raw: &str) -> AdapterResult<Reading> {
    let body = strip_code_fences(raw);
    let parsed: RawReading =
        serde_json::from_str(body).map_err(|e| AdapterError::Parse(e.to_string()))?;

    let action_items = match parsed.action_items {
        Some(ActionItems::One(item)) => vec![item],
        Some(ActionItems::Many(items)) => items,
        None => Vec::new(),
    };

    Ok(Reading {
        summary: parsed.summary,
        overall_story: parsed.overall_story,
        action_items,
    })
}

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence, if present.
pub fn strip_code_fences(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string on the opening fence.
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suffixed_keys() {
        let reading = parse_reading(
            r#"{"summary_en": "x", "overall_story_en": "y", "action_items_en": ["a", "b"],
                "prompt_used": "ignored"}"#,
        )
        .unwrap();
        assert_eq!(reading.summary, "x");
        assert_eq!(reading.overall_story, "y");
        assert_eq!(reading.action_items, ["a", "b"]);
    }

    #[test]
    fn parses_bare_keys_in_fence() {
        let raw = "```json\n{\"summary\": \"s\", \"overall_story\": \"o\", \"action_items\": []}\n```\n";
        let reading = parse_reading(raw).unwrap();
        assert_eq!(reading.summary, "s");
        assert!(reading.action_items.is_empty());
    }

    #[test]
    fn singleton_action_item_is_coerced() {
        let reading = parse_reading(
            r#"{"summary": "s", "overall_story": "o", "action_items": "breathe"}"#,
        )
        .unwrap();
        assert_eq!(reading.action_items, ["breathe"]);
    }

    #[test]
    fn missing_action_items_is_empty() {
        let reading = parse_reading(r#"{"summary": "s", "overall_story": "o"}"#).unwrap();
        assert!(reading.action_items.is_empty());
    }

    #[test]
    fn malformed_output_is_parse_error() {
        assert!(matches!(
            parse_reading("The cards say yes!"),
            Err(AdapterError::Parse(_))
        ));
        assert!(parse_reading("```json\n{\"summary\": \n```").is_err());
        assert!(parse_reading(r#"{"summary": "only"}"#).is_err());
        let numeric_items = r#"{"summary": "s", "overall_story": "o", "action_items": 3}"#;
        assert!(parse_reading(numeric_items).is_err());
    }

    #[test]
    fn fence_stripping() {
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```JSON\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```{}```"), "{}");
        assert_eq!(strip_code_fences("```json\n{}"), "{}");
    }

    #[test]
    fn localized_keys() {
        let reading = Reading {
            summary: "x".into(),
            overall_story: "y".into(),
            action_items: vec!["a".into()],
        };
        let value = serde_json::to_value(reading.localized(Language::Ko)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"summary_ko": "x", "overall_story_ko": "y", "action_items_ko": ["a"]})
        );
    }

    #[test]
    fn fallback_is_recognized() {
        let fallback = Reading::fallback();
        assert!(fallback.is_fallback());
        assert_eq!(fallback.action_items.len(), 3);
        assert!(!Reading::default().is_fallback());
    }
}
