//! User actions: read or write files, run the matching reconcile function,
//! and hand the outcome to the session. Every action returns the status it
//! left in the session message.

use std::path::Path;

use tracing::warn;

use crate::model::session::SessionState;
use crate::model::settings::Settings;
use crate::model::status::{DictionaryOutcome, Status, StatusKind};
use crate::services::{content_file, dictionary_store, files, reconcile};

fn require_content(session: &mut SessionState) -> Option<Status> {
    if session.is_empty() {
        return Some(session.report(Status::error("no content loaded")));
    }
    None
}

fn failed(session: &mut SessionState, err: impl std::fmt::Display) -> Status {
    warn!("{err}");
    session.report(Status::error(format!("error: {err}")))
}

/// Opens a content file, replacing the active set. Applies the master
/// dictionary right away when `settings.auto_apply` is on.
pub fn open_content(session: &mut SessionState, settings: &Settings, path: &Path) -> Status {
    let decoded = match content_file::read(path) {
        Ok(d) => d,
        Err(e) => return failed(session, e),
    };

    let loaded = reconcile::load_merge(session.entries(), decoded, &files::label(path));
    let load_text = loaded.status.text.clone();

    if !session.replace(loaded, Some(path.to_path_buf())) {
        return session.message().clone();
    }

    if !settings.auto_apply {
        return session.message().clone();
    }

    let dict = dictionary_store::load(&settings.dictionary_path);
    let mut applied = reconcile::apply_dictionary(session.entries(), &dict);

    let text = format!("{load_text}; {}", applied.status.text);
    if applied.status.is_error() {
        return session.report(Status::error(text));
    }

    applied.status = Status {
        kind: StatusKind::Success,
        text,
    };
    session.replace(applied, None);
    session.message().clone()
}

/// Overwrites the file the active set was loaded from.
pub fn save_content(session: &mut SessionState) -> Status {
    if let Some(status) = require_content(session) {
        return status;
    }

    let Some(path) = session.active_path().map(Path::to_path_buf) else {
        return session.report(Status::error("no file is open"));
    };

    match content_file::write(&path, session.entries()) {
        Ok(()) => {
            session.mark_saved();
            session.report(Status::success(format!("saved {}", files::label(&path))))
        }
        Err(e) => failed(session, e),
    }
}

/// Writes the active set to a new file, which becomes the active file.
pub fn save_content_as(session: &mut SessionState, path: &Path) -> Status {
    if let Some(status) = require_content(session) {
        return status;
    }

    match content_file::write(path, session.entries()) {
        Ok(()) => {
            session.set_active_path(path.to_path_buf());
            session.mark_saved();
            session.report(Status::success(format!("saved {}", files::label(path))))
        }
        Err(e) => failed(session, e),
    }
}

/// Copies translated text from another content file sharing ids.
pub fn transfer_from(session: &mut SessionState, path: &Path) -> Status {
    if let Some(status) = require_content(session) {
        return status;
    }

    let decoded = match content_file::read(path) {
        Ok(d) => d,
        Err(e) => return failed(session, e),
    };

    let outcome = reconcile::transfer_translations(session.entries(), decoded, &files::label(path));
    session.replace(outcome, None);
    session.message().clone()
}

pub fn apply_master(session: &mut SessionState, settings: &Settings) -> Status {
    if let Some(status) = require_content(session) {
        return status;
    }

    let dict = dictionary_store::load(&settings.dictionary_path);
    let outcome = reconcile::apply_dictionary(session.entries(), &dict);
    session.replace(outcome, None);
    session.message().clone()
}

pub fn save_master(session: &mut SessionState, settings: &Settings) -> Status {
    if let Some(status) = require_content(session) {
        return status;
    }

    let existing = dictionary_store::load(&settings.dictionary_path);
    let outcome = reconcile::save_dictionary(session.entries(), existing);
    persist(session, &settings.dictionary_path, outcome)
}

pub fn import_dictionary(session: &mut SessionState, path: &Path) -> Status {
    if let Some(status) = require_content(session) {
        return status;
    }

    let dict = dictionary_store::load(path);
    let outcome = reconcile::import_dictionary(session.entries(), &dict, &files::label(path));
    session.replace(outcome, None);
    session.message().clone()
}

pub fn export_dictionary(session: &mut SessionState, path: &Path) -> Status {
    if let Some(status) = require_content(session) {
        return status;
    }

    let outcome = reconcile::export_dictionary(session.entries());
    persist(session, path, outcome)
}

pub fn edit_entry(session: &mut SessionState, position: usize, text: &str) -> Status {
    session.edit(position, text)
}

pub fn close(session: &mut SessionState) -> Status {
    session.close();
    session.report(Status::neutral("closed"))
}

fn persist(session: &mut SessionState, path: &Path, outcome: DictionaryOutcome) -> Status {
    if !outcome.should_write() {
        return session.report(outcome.status);
    }

    match dictionary_store::save(path, &outcome.dict) {
        Ok(()) => session.report(outcome.status),
        Err(e) => failed(session, e),
    }
}
