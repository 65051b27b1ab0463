use serde::Serialize;
use std::path::{Path, PathBuf};

use super::entry::TranslationEntry;
use super::status::{EntriesOutcome, Status};

/// Editor state owned by the process loop.
///
/// Only `services::workspace` mutates it, and only after an engine call has
/// returned a complete outcome.
#[derive(Debug, Default)]
pub struct SessionState {
    entries: Vec<TranslationEntry>,
    active_path: Option<PathBuf>,
    dirty: bool,
    message: Status,
}

/// Snapshot sent back to the presentation layer after each command.
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub active_path: Option<String>,
    pub dirty: bool,
    pub total: usize,
    pub translated: usize,
    pub message: Status,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active_path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn message(&self) -> &Status {
        &self.message
    }

    pub fn translated_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_translated()).count()
    }

    /// Records `status` as the current message and hands it back.
    pub fn report(&mut self, status: Status) -> Status {
        self.message = status.clone();
        status
    }

    /// Takes an engine outcome. Error outcomes only update the message; the
    /// entry set is kept as it was.
    ///
    /// Returns `true` when the entry set was replaced.
    pub fn replace(&mut self, outcome: EntriesOutcome, path: Option<PathBuf>) -> bool {
        if outcome.status.is_error() {
            self.message = outcome.status;
            return false;
        }

        if outcome.entries != self.entries {
            self.dirty = true;
        }

        self.entries = outcome.entries;
        self.message = outcome.status;

        if let Some(p) = path {
            self.active_path = Some(p);
            self.dirty = false;
        }

        true
    }

    /// In-place edit of a single translated cell. Positions never move.
    pub fn edit(&mut self, position: usize, text: impl Into<String>) -> Status {
        let text = text.into();

        let Some(entry) = self.entries.iter_mut().find(|e| e.position == position) else {
            return self.report(Status::error(format!("no entry at row {position}")));
        };

        if entry.translated_text == text {
            return self.message.clone();
        }

        entry.translated_text = text;
        self.dirty = true;
        self.message.clone()
    }

    pub fn set_active_path(&mut self, path: PathBuf) {
        self.active_path = Some(path);
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn close(&mut self) {
        self.entries.clear();
        self.active_path = None;
        self.dirty = false;
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            active_path: self
                .active_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            dirty: self.dirty,
            total: self.entries.len(),
            translated: self.translated_count(),
            message: self.message.clone(),
        }
    }
}
