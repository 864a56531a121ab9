//! Sync configuration loading
//!
//! Loaded from (in order of priority):
//! 1. JSON file in the Zmail config directory (`zmail.json`)
//! 2. Runtime environment variables
//! 3. Built-in defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{Account, Tab};
use crate::sync::SyncTiming;

/// Config filename in the Zmail config directory
const CONFIG_FILE: &str = "zmail.json";

const ENV_ACCOUNT: &str = "ZMAIL_ACCOUNT";
const ENV_REFRESH_MS: &str = "ZMAIL_REFRESH_MS";
const ENV_SEARCH_DEBOUNCE_MS: &str = "ZMAIL_SEARCH_DEBOUNCE_MS";
const ENV_THREAD_MS: &str = "ZMAIL_THREAD_MS";

/// Settings for one mailbox session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Wallet address of the mailbox owner
    pub account: String,
    pub refresh_interval_ms: u64,
    pub search_debounce_ms: u64,
    pub thread_interval_ms: u64,
    /// Folder shown on startup
    pub initial_tab: Tab,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let timing = SyncTiming::default();
        Self {
            account: String::new(),
            refresh_interval_ms: timing.refresh_interval.as_millis() as u64,
            search_debounce_ms: timing.search_debounce.as_millis() as u64,
            thread_interval_ms: timing.thread_interval.as_millis() as u64,
            initial_tab: Tab::Inbox,
        }
    }
}

impl SyncConfig {
    /// Load config using the following priority:
    /// 1. JSON file (~/.config/zmail/zmail.json)
    /// 2. Environment variables
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        if config::config_exists(CONFIG_FILE) {
            return config::load_json(CONFIG_FILE);
        }
        Self::from_env()
    }

    /// Load config from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Parse config from a JSON string; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse sync config JSON")
    }

    /// Defaults overridden by whichever environment variables are set
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(account) = lookup(ENV_ACCOUNT) {
            cfg.account = account;
        }
        if let Some(ms) = lookup(ENV_REFRESH_MS) {
            cfg.refresh_interval_ms = parse_millis(ENV_REFRESH_MS, &ms)?;
        }
        if let Some(ms) = lookup(ENV_SEARCH_DEBOUNCE_MS) {
            cfg.search_debounce_ms = parse_millis(ENV_SEARCH_DEBOUNCE_MS, &ms)?;
        }
        if let Some(ms) = lookup(ENV_THREAD_MS) {
            cfg.thread_interval_ms = parse_millis(ENV_THREAD_MS, &ms)?;
        }
        Ok(cfg)
    }

    /// Persist to the Zmail config directory
    pub fn save(&self) -> Result<()> {
        config::save_json(CONFIG_FILE, self)
    }

    /// Get the default config file path (~/.config/zmail/zmail.json)
    pub fn default_path() -> Option<PathBuf> {
        config::config_path(CONFIG_FILE)
    }

    pub fn account(&self) -> Account {
        Account::new(self.account.clone())
    }

    pub fn timing(&self) -> SyncTiming {
        SyncTiming::from_millis(
            self.refresh_interval_ms,
            self.search_debounce_ms,
            self.thread_interval_ms,
        )
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of milliseconds, got {:?}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "account": "0xAbC123",
            "refresh_interval_ms": 2000,
            "search_debounce_ms": 100,
            "thread_interval_ms": 7000,
            "initial_tab": "sent"
        }"#;

        let cfg = SyncConfig::from_json(json).unwrap();
        assert_eq!(cfg.account().address, "0xAbC123");
        assert_eq!(cfg.initial_tab, Tab::Sent);

        let timing = cfg.timing();
        assert_eq!(timing.refresh_interval, Duration::from_millis(2000));
        assert_eq!(timing.search_debounce, Duration::from_millis(100));
        assert_eq!(timing.thread_interval, Duration::from_millis(7000));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let cfg = SyncConfig::from_json(r#"{ "account": "0x1" }"#).unwrap();
        assert_eq!(cfg.refresh_interval_ms, 5000);
        assert_eq!(cfg.search_debounce_ms, 300);
        assert_eq!(cfg.thread_interval_ms, 5000);
        assert_eq!(cfg.initial_tab, Tab::Inbox);
    }

    #[test]
    fn test_invalid_json() {
        assert!(SyncConfig::from_json(r#"{ "refresh_interval_ms": "soon" }"#).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(ENV_ACCOUNT, "0xEnv"), (ENV_SEARCH_DEBOUNCE_MS, "50")]);
        let cfg = SyncConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.account, "0xEnv");
        assert_eq!(cfg.search_debounce_ms, 50);
        assert_eq!(cfg.refresh_interval_ms, 5000);

        let bad: HashMap<&str, &str> = HashMap::from([(ENV_THREAD_MS, "fast")]);
        let err = SyncConfig::from_lookup(|k| bad.get(k).map(|v| v.to_string())).unwrap_err();
        assert!(err.to_string().contains(ENV_THREAD_MS));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zmail.json");
        std::fs::write(&path, r#"{ "account": "0xFile", "initial_tab": "trash" }"#).unwrap();

        let cfg = SyncConfig::from_file(&path).unwrap();
        assert_eq!(cfg.account, "0xFile");
        assert_eq!(cfg.initial_tab, Tab::Trash);
    }
}
