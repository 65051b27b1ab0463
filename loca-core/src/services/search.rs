use regex::RegexBuilder;
use serde::Serialize;

use crate::model::entry::TranslationEntry;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub translated: usize,
}

pub fn progress(entries: &[TranslationEntry]) -> Progress {
    Progress {
        total: entries.len(),
        translated: entries.iter().filter(|e| e.is_translated()).count(),
    }
}

/// Rows whose id, original or translated text contain `query`, ignoring case.
pub fn filter<'a>(entries: &'a [TranslationEntry], query: &str) -> Vec<&'a TranslationEntry> {
    let query = query.trim();
    if query.is_empty() {
        return entries.iter().collect();
    }

    let Ok(re) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return Vec::new();
    };

    entries
        .iter()
        .filter(|e| {
            re.is_match(&e.id) || re.is_match(&e.original_text) || re.is_match(&e.translated_text)
        })
        .collect()
}
