use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Writes through a sibling temp file so readers never see a half-written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CoreError::write(parent, e))?;
    }

    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(CoreError::write(&tmp, e));
    }

    // rename replaces an existing destination; on failure the old file stays.
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(CoreError::write(path, e));
    }

    Ok(())
}

/// File name for status lines; falls back to the full path.
pub fn label(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "loca".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
