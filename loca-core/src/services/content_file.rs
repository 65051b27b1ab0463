use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::model::entry::{ContentRecord, TranslationEntry};
use crate::parsers::content_xml::{self, ContentDecodeError};
use crate::services::{encoding, files};

/// Reads a content file from disk.
///
/// I/O failures come back as the outer `Err`; a file that was read but is
/// not a valid content list comes back as the inner `Err`, which is what the
/// reconcile functions take.
pub fn read(path: &Path) -> Result<std::result::Result<Vec<ContentRecord>, ContentDecodeError>> {
    let text = encoding::read_text(path)?;
    let decoded = content_xml::decode(&text);

    if let Ok(records) = &decoded {
        info!(path = %path.display(), records = records.len(), "content read");
    }

    Ok(decoded)
}

/// Writes the translated text of `entries` to `path`.
pub fn write(path: &Path, entries: &[TranslationEntry]) -> Result<()> {
    let xml = content_xml::encode(&content_xml::records_for_write(entries));
    files::write_atomic(path, xml.as_bytes())?;
    info!(path = %path.display(), records = entries.len(), "content written");
    Ok(())
}
