use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{CoreError, Result};
use crate::model::settings::Settings;
use crate::services::files;

const SETTINGS_FILE: &str = "settings.json";
const DICT_FILE: &str = "dict.yml";

/// Directory holding settings and the default master dictionary.
pub fn base_dir() -> PathBuf {
    if let Some(home) = env_path("LOCA_HOME") {
        return home;
    }
    if let Some(local) = env_path("LOCALAPPDATA") {
        return local.join("LocaTranslator");
    }
    if let Some(xdg) = env_path("XDG_CONFIG_HOME") {
        return xdg.join("loca-translator");
    }
    if let Some(home) = env_path("HOME") {
        return home.join(".config").join("loca-translator");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("loca-translator")
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub fn settings_path() -> PathBuf {
    base_dir().join(SETTINGS_FILE)
}

pub fn default_settings() -> Settings {
    Settings::with_dictionary(base_dir().join(DICT_FILE))
}

/// Loads settings from the default location. Never fails: a broken file is
/// logged and replaced by defaults.
pub fn load() -> Settings {
    let loaded = match load_from(&settings_path()) {
        Ok(v) => v,
        Err(e) => {
            warn!("failed to load settings, using defaults: {e}");
            None
        }
    };

    let mut settings = loaded.unwrap_or_else(default_settings);

    if settings.dictionary_path.as_os_str().is_empty() {
        settings.dictionary_path = default_settings().dictionary_path;
    }

    if let Some(dict) = env_path("LOCA_DICT_PATH") {
        settings.dictionary_path = dict;
    }

    settings
}

/// `Ok(None)` when no settings file exists.
pub fn load_from(path: &Path) -> Result<Option<Settings>> {
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read_to_string(path).map_err(|e| CoreError::read(path, e))?;
    let settings = serde_json::from_str::<Settings>(&data)?;
    Ok(Some(settings))
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    files::write_atomic(path, json.as_bytes())?;
    info!(path = %path.display(), "settings saved");
    Ok(())
}
