use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Translation stored for one content id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DictValue {
    #[serde(
        rename = "originText",
        deserialize_with = "crate::parsers::dictionary_yaml::scalar_text"
    )]
    pub origin_text: String,

    #[serde(
        rename = "translatedText",
        deserialize_with = "crate::parsers::dictionary_yaml::scalar_text"
    )]
    pub translated_text: String,
}

impl DictValue {
    pub fn new(origin_text: impl Into<String>, translated_text: impl Into<String>) -> Self {
        Self {
            origin_text: origin_text.into(),
            translated_text: translated_text.into(),
        }
    }

    /// Entries where both texts match carry no translation work.
    pub fn is_noop(&self) -> bool {
        self.origin_text == self.translated_text
    }
}

/// Key-unique mapping `content id -> DictValue`, kept sorted by id so that
/// serialized dictionaries are deterministic.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Dictionary {
    entries: BTreeMap<String, DictValue>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&DictValue> {
        self.entries.get(id)
    }

    /// Inserts or replaces the whole value for `id`. Returns the previous value.
    pub fn upsert(&mut self, id: impl Into<String>, value: DictValue) -> Option<DictValue> {
        self.entries.insert(id.into(), value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, DictValue)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (String, DictValue)>>(iter: I) -> Self {
        let mut dict = Dictionary::new();
        for (id, value) in iter {
            dict.upsert(id, value);
        }
        dict
    }
}

/// Outcome of reading a dictionary file from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryLoad {
    /// No file at the location. Not an error.
    Missing,
    /// The file exists but could not be read or parsed.
    Corrupt(String),
    Loaded(Dictionary),
}
