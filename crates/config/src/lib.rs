//! Shared settings directory for Zmail binaries
//!
//! Settings live as JSON files under the platform config root, in a `zmail`
//! subdirectory (`~/.config/zmail/` on Linux). Binaries call [`init`] once on
//! startup; library code only reads and writes named files through here.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "zmail";

/// Create the settings directory if missing and return its path
pub fn init() -> Result<PathBuf> {
    ensure_config_dir()
}

/// Settings directory, or `None` when the platform has no config root
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|root| root.join(APP_DIR))
}

pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(filename))
}

/// Read a named settings file
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let path = config_path(filename).context("No config root on this platform")?;
    load_json_file(&path)
}

/// Read settings from an explicit path. Errors name the path.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Malformed JSON in {}", path.display()))
}

pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|path| path.exists())
}

pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir().context("No config root on this platform")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create settings directory {}", dir.display()))?;
    Ok(dir)
}

/// Write a named settings file, creating the directory first
pub fn save_json<T: Serialize>(filename: &str, value: &T) -> Result<()> {
    let dir = ensure_config_dir()?;
    save_json_file(&dir.join(filename), value)
}

/// Write pretty-printed JSON to an explicit path
pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))
}
