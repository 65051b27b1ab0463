use serde::{Deserialize, Serialize};

use super::dictionary::Dictionary;
use super::entry::TranslationEntry;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    #[default]
    Neutral,
    Success,
    Error,
}

/// Human-readable outcome line shown by the presentation layer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    pub fn neutral(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Neutral,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// New translation set produced by an engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntriesOutcome {
    pub entries: Vec<TranslationEntry>,
    pub status: Status,
}

/// Dictionary produced by a save/export call.
///
/// `written` is the number of translated entries that went into `dict`;
/// zero means the caller must not touch the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryOutcome {
    pub dict: Dictionary,
    pub status: Status,
    pub written: usize,
}

impl DictionaryOutcome {
    pub fn should_write(&self) -> bool {
        self.written > 0 && !self.status.is_error()
    }
}
