//! Configuration types for callcrm.
//!
//! [`Config::load`] reads `~/.config/callcrm/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::load_from`] layers an
//! explicit file instead. [`Config::defaults`] returns the same defaults
//! without touching the filesystem (useful in tests).

use crate::view::is_valid_timestamp_format;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[ui]
show_added_at    = true
timestamp_format = "%Y-%m-%d %H:%M:%S"
table_height_pct = 45
player_command   = "xdg-open"

[sheets]
default_url          = ""
cache_ttl_secs       = 300
request_timeout_secs = 30
user_agent           = "callcrm/0.1"

[keybindings]
add_call       = "a"
command        = ":"
help           = "?"
open_recording = "o"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_show_added_at")]
    pub show_added_at: bool,
    /// chrono format string used to display `added_at`.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Share of the body given to the call table; the detail pane gets the rest.
    #[serde(default = "default_table_height_pct")]
    pub table_height_pct: u16,
    /// External program that receives a recording URL as its only argument.
    #[serde(default = "default_player_command")]
    pub player_command: String,
}

fn default_show_added_at() -> bool { true }
fn default_timestamp_format() -> String { "%Y-%m-%d %H:%M:%S".to_string() }
fn default_table_height_pct() -> u16 { 45 }
fn default_player_command() -> String { "xdg-open".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_added_at: default_show_added_at(),
            timestamp_format: default_timestamp_format(),
            table_height_pct: default_table_height_pct(),
            player_command: default_player_command(),
        }
    }
}

/// `[sheets]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    /// Sheet loaded by a bare `:sheet` command. Empty means none.
    #[serde(default)]
    pub default_url: String,
    /// How long a fetched sheet is reused before it is fetched again.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_cache_ttl_secs() -> u64 { 300 }
fn default_request_timeout_secs() -> u64 { 30 }
fn default_user_agent() -> String { "callcrm/0.1".to_string() }

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            default_url: String::new(),
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl SheetsConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `[keybindings]` section of `config.toml`.
///
/// Each binding is a single character typed in normal mode.
#[derive(Debug, Clone, Deserialize)]
pub struct KeybindingsConfig {
    #[serde(default = "default_add_call")]
    pub add_call: String,
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_open_recording")]
    pub open_recording: String,
}

fn default_add_call() -> String { "a".to_string() }
fn default_command() -> String { ":".to_string() }
fn default_help() -> String { "?".to_string() }
fn default_open_recording() -> String { "o".to_string() }

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            add_call: default_add_call(),
            command: default_command(),
            help: default_help(),
            open_recording: default_open_recording(),
        }
    }
}

impl KeybindingsConfig {
    /// First character of a binding, or `fallback` when the binding is empty.
    pub fn key(binding: &str, fallback: char) -> char {
        binding.chars().next().unwrap_or(fallback)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/callcrm/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::layered(&path)
    }

    /// Load an explicit config file layered on top of the built-in defaults.
    /// The file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("config file {} does not exist", path.display());
        }
        Self::layered(path)
    }

    fn layered(path: &Path) -> anyhow::Result<Self> {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()?;
        cfg.validate()
            .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !is_valid_timestamp_format(&self.ui.timestamp_format) {
            anyhow::bail!("[ui] timestamp_format {:?} is not a valid strftime format", self.ui.timestamp_format);
        }
        Ok(())
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("callcrm")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
