use serde::{Deserialize, Serialize};

/// One localizable unit as it appears in a content file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub id: String,

    #[serde(default)]
    pub text: String,
}

impl ContentRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A content record with translation state attached.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Row handle: index into the active set when the set was built.
    #[serde(default)]
    pub position: usize,

    pub id: String,

    #[serde(default)]
    pub original_text: String,

    #[serde(default)]
    pub translated_text: String,
}

impl TranslationEntry {
    /// Fresh entry for a record seen for the first time: untranslated.
    pub fn from_record(position: usize, record: ContentRecord) -> Self {
        Self {
            position,
            translated_text: record.text.clone(),
            original_text: record.text,
            id: record.id,
        }
    }

    pub fn is_translated(&self) -> bool {
        self.translated_text != self.original_text
    }
}

/// Protocol view of an entry, carrying the derived flag alongside the data.
#[derive(Debug, Serialize)]
pub struct EntryView<'a> {
    #[serde(flatten)]
    pub entry: &'a TranslationEntry,
    pub is_translated: bool,
}

impl<'a> From<&'a TranslationEntry> for EntryView<'a> {
    fn from(entry: &'a TranslationEntry) -> Self {
        Self {
            entry,
            is_translated: entry.is_translated(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_record_starts_untranslated() {
        let e = TranslationEntry::from_record(3, ContentRecord::new("h1", "Hello"));
        assert_eq!(e.position, 3);
        assert_eq!(e.id, "h1");
        assert_eq!(e.translated_text, "Hello");
        assert!(!e.is_translated());
    }

    #[test]
    fn translated_flag_is_derived_from_text() {
        let mut e = TranslationEntry::from_record(0, ContentRecord::new("h1", "Hello"));
        e.translated_text = "Bonjour".into();
        assert!(e.is_translated());

        e.translated_text = "Hello".into();
        assert!(!e.is_translated());
    }

    #[test]
    fn view_serializes_flag_inline() {
        let mut e = TranslationEntry::from_record(0, ContentRecord::new("h1", "a"));
        e.translated_text = "b".into();
        let v = serde_json::to_value(EntryView::from(&e)).unwrap();
        assert_eq!(v["id"], "h1");
        assert_eq!(v["translated_text"], "b");
        assert_eq!(v["is_translated"], true);
    }
}
