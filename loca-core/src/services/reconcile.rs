//! Pure merge operations between the active translation set and the data
//! read from content or dictionary files.
//!
//! Three matching policies live here and must stay separate:
//! - `load_merge`: full replace, nothing is matched;
//! - `apply_dictionary` / `import_dictionary`: id and original text must
//!   both match, stale dictionary rows are skipped;
//! - `transfer_translations`: id alone is trusted.
//!
//! Every function takes borrowed input and returns a fresh vector.

use std::collections::HashMap;

use tracing::debug;

use crate::model::dictionary::{DictValue, Dictionary, DictionaryLoad};
use crate::model::entry::{ContentRecord, TranslationEntry};
use crate::model::status::{DictionaryOutcome, EntriesOutcome, Status};
use crate::parsers::content_xml::ContentDecodeError;

/// Replaces the active set with the freshly decoded file.
pub fn load_merge(
    current: &[TranslationEntry],
    decoded: Result<Vec<ContentRecord>, ContentDecodeError>,
    source_name: &str,
) -> EntriesOutcome {
    let records = match decoded {
        Ok(r) if !r.is_empty() => r,
        Ok(_) => return unchanged(current, format!("{source_name} contains no entries")),
        Err(e) => return unchanged(current, format!("failed to load {source_name}: {e}")),
    };

    let entries: Vec<TranslationEntry> = records
        .into_iter()
        .enumerate()
        .map(|(i, r)| TranslationEntry::from_record(i, r))
        .collect();

    debug!(source = source_name, count = entries.len(), "load merge");

    let status = Status::success(format!(
        "loaded {source_name} ({} entries)",
        entries.len()
    ));

    EntriesOutcome { entries, status }
}

/// Applies the master dictionary to the active set.
pub fn apply_dictionary(entries: &[TranslationEntry], dict: &DictionaryLoad) -> EntriesOutcome {
    match dict {
        DictionaryLoad::Missing => EntriesOutcome {
            entries: entries.to_vec(),
            status: Status::neutral("no dictionary found, loaded without translation"),
        },
        DictionaryLoad::Corrupt(reason) => unchanged(
            entries,
            format!(
                "failed to load dictionary file ({reason}); please move or remove the dictionary file"
            ),
        ),
        DictionaryLoad::Loaded(d) => {
            let (entries, updated) = merge_matching(entries, d);
            EntriesOutcome {
                entries,
                status: Status::success(format!("translation applied: {updated} entries updated")),
            }
        }
    }
}

/// Applies a user-chosen dictionary file. Same matching rule as
/// [`apply_dictionary`]; only the reporting differs.
pub fn import_dictionary(
    entries: &[TranslationEntry],
    dict: &DictionaryLoad,
    source_name: &str,
) -> EntriesOutcome {
    match dict {
        DictionaryLoad::Missing => EntriesOutcome {
            entries: entries.to_vec(),
            status: Status::neutral(format!("no dictionary found at {source_name}")),
        },
        DictionaryLoad::Corrupt(reason) => unchanged(
            entries,
            format!("failed to import {source_name} ({reason}); please check the dictionary file"),
        ),
        DictionaryLoad::Loaded(d) => {
            let (entries, updated) = merge_matching(entries, d);
            EntriesOutcome {
                entries,
                status: Status::success(format!(
                    "translation imported from {source_name}: {updated} entries updated"
                )),
            }
        }
    }
}

/// Upserts every translated row into the existing master dictionary.
pub fn save_dictionary(entries: &[TranslationEntry], existing: DictionaryLoad) -> DictionaryOutcome {
    let mut dict = match existing {
        DictionaryLoad::Loaded(d) => d,
        DictionaryLoad::Missing => Dictionary::new(),
        DictionaryLoad::Corrupt(reason) => {
            return DictionaryOutcome {
                dict: Dictionary::new(),
                status: Status::error(format!(
                    "failed to load existing dictionary file ({reason}); please move or remove the dictionary file"
                )),
                written: 0,
            }
        }
    };

    let rows = translated_rows(entries);

    if rows.is_empty() {
        return DictionaryOutcome {
            dict,
            status: Status::neutral("no translated entries, dictionary not saved"),
            written: 0,
        };
    }

    let written = rows.len();
    for (id, value) in rows {
        dict.upsert(id, value);
    }

    debug!(written, total = dict.len(), "save dictionary");

    let status = Status::success(format!(
        "translation saved: {written} entries ({} in dictionary)",
        dict.len()
    ));

    DictionaryOutcome {
        dict,
        status,
        written,
    }
}

/// Builds a standalone dictionary from the translated rows. Never merged
/// with anything already at the destination.
pub fn export_dictionary(entries: &[TranslationEntry]) -> DictionaryOutcome {
    let dict: Dictionary = translated_rows(entries).into_iter().collect();

    if dict.is_empty() {
        return DictionaryOutcome {
            dict,
            status: Status::error("0 translations detected, no file saved"),
            written: 0,
        };
    }

    let written = dict.len();
    DictionaryOutcome {
        dict,
        status: Status::success(format!("translation exported: {written} entries")),
        written,
    }
}

/// Pulls translated text from a sibling content file, matching on id only.
pub fn transfer_translations(
    entries: &[TranslationEntry],
    decoded: Result<Vec<ContentRecord>, ContentDecodeError>,
    source_name: &str,
) -> EntriesOutcome {
    let records = match decoded {
        Ok(r) => r,
        Err(e) => return unchanged(entries, format!("failed to load {source_name}: {e}")),
    };

    // Later records win on duplicate ids.
    let source: HashMap<&str, &str> = records
        .iter()
        .map(|r| (r.id.as_str(), r.text.as_str()))
        .collect();

    let mut matched = 0usize;
    let mut updated = 0usize;

    let merged: Vec<TranslationEntry> = entries
        .iter()
        .map(|e| {
            let mut next = e.clone();
            if let Some(text) = source.get(e.id.as_str()) {
                matched += 1;
                if next.translated_text != *text {
                    next.translated_text = (*text).to_string();
                    updated += 1;
                }
            }
            next
        })
        .collect();

    debug!(source = source_name, matched, updated, "transfer translations");

    let status = if matched == 0 {
        Status::neutral(format!("no matching entries in {source_name}"))
    } else {
        Status::success(format!(
            "transferred from {source_name}: {updated} entries updated ({matched} matched)"
        ))
    };

    EntriesOutcome {
        entries: merged,
        status,
    }
}

fn merge_matching(entries: &[TranslationEntry], dict: &Dictionary) -> (Vec<TranslationEntry>, usize) {
    let mut updated = 0usize;

    let merged = entries
        .iter()
        .map(|e| {
            let mut next = e.clone();
            let hit = dict
                .get(&e.id)
                .filter(|v| !v.is_noop() && v.origin_text == e.original_text);

            if let Some(v) = hit {
                if next.translated_text != v.translated_text {
                    next.translated_text = v.translated_text.clone();
                    updated += 1;
                }
            }
            next
        })
        .collect();

    debug!(updated, dictionary = dict.len(), "dictionary merge");

    (merged, updated)
}

fn translated_rows(entries: &[TranslationEntry]) -> Vec<(String, DictValue)> {
    entries
        .iter()
        .filter(|e| e.is_translated())
        .map(|e| {
            (
                e.id.clone(),
                DictValue::new(e.original_text.clone(), e.translated_text.clone()),
            )
        })
        .collect()
}

fn unchanged(entries: &[TranslationEntry], message: String) -> EntriesOutcome {
    EntriesOutcome {
        entries: entries.to_vec(),
        status: Status::error(message),
    }
}
