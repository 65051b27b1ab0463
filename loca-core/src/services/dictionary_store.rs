use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::model::dictionary::{Dictionary, DictionaryLoad};
use crate::parsers::dictionary_yaml;
use crate::services::{encoding, files};

/// Reads a dictionary file, distinguishing "absent" from "unusable".
pub fn load(path: &Path) -> DictionaryLoad {
    if !path.exists() {
        return DictionaryLoad::Missing;
    }

    let data = match encoding::read_text(path) {
        Ok(s) => s,
        Err(e) => {
            warn!("[dict] {e}");
            return DictionaryLoad::Corrupt(e.to_string());
        }
    };

    match dictionary_yaml::decode_dict(&data) {
        Ok(dict) => {
            info!(path = %path.display(), entries = dict.len(), "[dict] loaded");
            DictionaryLoad::Loaded(dict)
        }
        Err(e) => {
            warn!(path = %path.display(), "[dict] failed to parse: {e}");
            DictionaryLoad::Corrupt(e.to_string())
        }
    }
}

/// Full rewrite of the file at `path`.
pub fn save(path: &Path, dict: &Dictionary) -> Result<()> {
    let yaml = dictionary_yaml::encode_dict(dict)?;
    files::write_atomic(path, yaml.as_bytes())?;
    info!(path = %path.display(), entries = dict.len(), "[dict] saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dictionary::DictValue;
    use std::fs;

    #[test]
    fn absent_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load(&dir.path().join("dict.yml")), DictionaryLoad::Missing);
    }

    #[test]
    fn unparsable_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.yml");
        fs::write(&path, "h1: [broken").unwrap();

        assert!(matches!(load(&path), DictionaryLoad::Corrupt(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.yml");
        let dict: Dictionary = vec![("h1".to_string(), DictValue::new("a", "b"))]
            .into_iter()
            .collect();

        save(&path, &dict).unwrap();

        assert_eq!(load(&path), DictionaryLoad::Loaded(dict));
    }
}
