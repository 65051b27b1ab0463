use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_auto_apply() -> bool {
    true
}

/// User preferences persisted between runs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Location of the master dictionary.
    #[serde(default, alias = "dict_path")]
    pub dictionary_path: PathBuf,

    /// Apply the master dictionary right after a content file is opened.
    #[serde(default = "default_auto_apply", alias = "auto_translation")]
    pub auto_apply: bool,
}

impl Settings {
    pub fn with_dictionary(dictionary_path: impl Into<PathBuf>) -> Self {
        Self {
            dictionary_path: dictionary_path.into(),
            auto_apply: default_auto_apply(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert!(s.auto_apply);
        assert_eq!(s.dictionary_path, PathBuf::new());
    }

    #[test]
    fn accepts_legacy_field_names() {
        let s: Settings =
            serde_json::from_str(r#"{"dict_path": "/tmp/d.yml", "auto_translation": false}"#)
                .unwrap();
        assert_eq!(s.dictionary_path, PathBuf::from("/tmp/d.yml"));
        assert!(!s.auto_apply);
    }
}
