use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

use crate::model::dictionary::{DictValue, Dictionary};

#[derive(Debug, Error)]
pub enum DictionaryDecodeError {
    #[error("yaml syntax: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("expected a mapping or a list at the top level")]
    UnexpectedShape,

    #[error("unsupported key type for entry #{index}")]
    InvalidKey { index: usize },

    #[error("entry `{id}`: {reason}")]
    InvalidEntry { id: String, reason: String },
}

/// Row layout written by earlier versions of the editor.
#[derive(Debug, Deserialize)]
struct LegacyRow {
    contentuid: Value,

    #[serde(rename = "originText", deserialize_with = "scalar_text")]
    origin_text: String,

    #[serde(rename = "translatedText", deserialize_with = "scalar_text")]
    translated_text: String,
}

/// Text field that tolerates hand-edited scalars: `10`, `true` and `1.5`
/// are read as their written form, an empty value as "".
pub(crate) fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        other => scalar_key(&other).ok_or_else(|| D::Error::custom("expected a text value")),
    }
}

/// Parses a dictionary file. Entries that carry no translation are dropped.
pub fn decode_dict(text: &str) -> Result<Dictionary, DictionaryDecodeError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if text.trim().is_empty() {
        return Ok(Dictionary::new());
    }

    let root: Value = serde_yaml::from_str(text)?;

    let pairs = match root {
        Value::Null => Vec::new(),
        Value::Mapping(map) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (index, (key, value)) in map.into_iter().enumerate() {
                let id = scalar_key(&key).ok_or(DictionaryDecodeError::InvalidKey { index })?;
                let value: DictValue = serde_yaml::from_value(value).map_err(|e| {
                    DictionaryDecodeError::InvalidEntry {
                        id: id.clone(),
                        reason: e.to_string(),
                    }
                })?;
                pairs.push((id, value));
            }
            pairs
        }
        Value::Sequence(rows) => {
            let mut pairs = Vec::with_capacity(rows.len());
            for (index, row) in rows.into_iter().enumerate() {
                let row: LegacyRow = serde_yaml::from_value(row).map_err(|e| {
                    DictionaryDecodeError::InvalidEntry {
                        id: format!("#{index}"),
                        reason: e.to_string(),
                    }
                })?;
                let id = scalar_key(&row.contentuid)
                    .ok_or(DictionaryDecodeError::InvalidKey { index })?;
                pairs.push((id, DictValue::new(row.origin_text, row.translated_text)));
            }
            pairs
        }
        _ => return Err(DictionaryDecodeError::UnexpectedShape),
    };

    let total = pairs.len();
    let dict: Dictionary = pairs.into_iter().filter(|(_, v)| !v.is_noop()).collect();

    debug!(total, kept = dict.len(), "decoded dictionary");

    Ok(dict)
}

/// Serializes the full mapping. Always a complete rewrite.
pub fn encode_dict(dict: &Dictionary) -> Result<String, serde_yaml::Error> {
    if dict.is_empty() {
        return Ok(String::new());
    }
    serde_yaml::to_string(dict)
}

fn scalar_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_null_documents_are_empty() {
        assert!(decode_dict("").unwrap().is_empty());
        assert!(decode_dict("   \n").unwrap().is_empty());
        assert!(decode_dict("~\n").unwrap().is_empty());
    }

    #[test]
    fn decodes_mapping_form() {
        let dict = decode_dict(
            "h1:\n  originText: Hello\n  translatedText: Hallo\nh2:\n  originText: Bye\n  translatedText: Tschüss\n",
        )
        .unwrap();

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("h1"), Some(&DictValue::new("Hello", "Hallo")));
    }

    #[test]
    fn decodes_legacy_list_with_last_row_winning() {
        let dict = decode_dict(
            "- contentuid: h1\n  originText: Hello\n  translatedText: Hallo\n- contentuid: h1\n  originText: Hello\n  translatedText: Servus\n",
        )
        .unwrap();

        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("h1").unwrap().translated_text, "Servus");
    }

    #[test]
    fn ignores_unknown_fields_and_numeric_keys() {
        let dict = decode_dict(
            "123:\n  originText: a\n  translatedText: b\n  note: reviewed\n",
        )
        .unwrap();

        assert_eq!(dict.get("123"), Some(&DictValue::new("a", "b")));
    }

    #[test]
    fn unquoted_scalars_are_read_as_text() {
        let dict = decode_dict(
            "h1:\n  originText: Level\n  translatedText: 10\nh2:\n  originText: false\n  translatedText: nein\nh3:\n  originText: Cost\n  translatedText:\n",
        )
        .unwrap();

        assert_eq!(dict.get("h1"), Some(&DictValue::new("Level", "10")));
        assert_eq!(dict.get("h2"), Some(&DictValue::new("false", "nein")));
        assert_eq!(dict.get("h3"), Some(&DictValue::new("Cost", "")));

        let legacy = decode_dict("- contentuid: h1\n  originText: Level\n  translatedText: 10\n")
            .unwrap();
        assert_eq!(legacy.get("h1"), Some(&DictValue::new("Level", "10")));
    }

    #[test]
    fn nested_values_are_still_rejected() {
        assert!(matches!(
            decode_dict("h1:\n  originText: a\n  translatedText: [b, c]\n").unwrap_err(),
            DictionaryDecodeError::InvalidEntry { .. }
        ));
    }

    #[test]
    fn drops_noop_entries() {
        let dict = decode_dict(
            "h1:\n  originText: same\n  translatedText: same\nh2:\n  originText: a\n  translatedText: b\n",
        )
        .unwrap();

        assert!(dict.get("h1").is_none());
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            decode_dict("just a string").unwrap_err(),
            DictionaryDecodeError::UnexpectedShape
        ));
        assert!(matches!(
            decode_dict("h1:\n  originText: a\n").unwrap_err(),
            DictionaryDecodeError::InvalidEntry { .. }
        ));
        assert!(matches!(
            decode_dict("h1: [unclosed").unwrap_err(),
            DictionaryDecodeError::Syntax(_)
        ));
    }

    #[test]
    fn encode_then_decode_keeps_entries() {
        let dict: Dictionary = vec![
            ("h2".to_string(), DictValue::new("b", "B: with colon")),
            ("h1".to_string(), DictValue::new("a", "line\nbreak")),
        ]
        .into_iter()
        .collect();

        let text = encode_dict(&dict).unwrap();

        assert!(text.find("h1").unwrap() < text.find("h2").unwrap());
        assert_eq!(decode_dict(&text).unwrap(), dict);
    }

    #[test]
    fn empty_dictionary_encodes_to_empty_text() {
        assert_eq!(encode_dict(&Dictionary::new()).unwrap(), "");
    }
}
