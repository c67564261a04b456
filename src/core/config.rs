//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.banter/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BanterConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    pub word_delay_ms: Option<u64>,
    pub punctuation_pause_ms: Option<u64>,
    pub reply_delay_min_ms: Option<u64>,
    pub reply_delay_max_ms: Option<u64>,
    pub max_messages: Option<usize>,
    pub max_input_chars: Option<usize>,
    /// Path to a replies JSON file; the embedded book is used when unset.
    pub replies_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Render replies as literal text instead of Markdown.
    pub plain: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_WORD_DELAY_MS: u64 = 100;
pub const DEFAULT_PUNCTUATION_PAUSE_MS: u64 = 250;
pub const DEFAULT_REPLY_DELAY_MIN_MS: u64 = 600;
pub const DEFAULT_REPLY_DELAY_MAX_MS: u64 = 1400;
pub const DEFAULT_MAX_MESSAGES: usize = 200;
pub const DEFAULT_MAX_INPUT_CHARS: usize = 2000;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub word_delay_ms: u64,
    pub punctuation_pause_ms: u64,
    pub reply_delay_min_ms: u64,
    pub reply_delay_max_ms: u64,
    pub max_messages: usize,
    pub max_input_chars: usize,
    pub replies_file: Option<PathBuf>,
    pub plain: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.banter/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".banter").join("config.toml"))
}

/// Load config from `~/.banter/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `BanterConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<BanterConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(BanterConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(BanterConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: BanterConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Banter Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [chat]
# word_delay_ms = 100          # delay between revealed words
# punctuation_pause_ms = 250   # longer pause after . ! ? , ;
# reply_delay_min_ms = 600     # typing indicator shows at least this long
# reply_delay_max_ms = 1400    # ...and at most this long
# max_messages = 200           # oldest messages dropped past this count
# max_input_chars = 2000       # longer submissions are rejected
# replies_file = "replies.json"  # Path relative to ~/.banter/

# [display]
# plain = false                # true renders replies as literal text
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env
/// vars → CLI.
///
/// `cli_plain` and `cli_replies` are from CLI flags (false / None = not
/// specified).
pub fn resolve(config: &BanterConfig, cli_plain: bool, cli_replies: Option<&Path>) -> ResolvedConfig {
    // Plain display: CLI → env → config → default
    let plain = cli_plain
        || std::env::var("BANTER_PLAIN").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        || config.display.plain.unwrap_or(false);

    // Replies file: CLI → env → config
    let replies_file = cli_replies
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("BANTER_REPLIES").ok().map(PathBuf::from))
        .or_else(|| config.chat.replies_file.as_ref().map(resolve_replies_path));

    let mut reply_delay_min_ms = config
        .chat
        .reply_delay_min_ms
        .unwrap_or(DEFAULT_REPLY_DELAY_MIN_MS);
    let mut reply_delay_max_ms = config
        .chat
        .reply_delay_max_ms
        .unwrap_or(DEFAULT_REPLY_DELAY_MAX_MS);
    if reply_delay_min_ms > reply_delay_max_ms {
        warn!(
            "reply_delay_min_ms ({reply_delay_min_ms}) exceeds reply_delay_max_ms \
             ({reply_delay_max_ms}); swapping"
        );
        std::mem::swap(&mut reply_delay_min_ms, &mut reply_delay_max_ms);
    }

    let max_messages = config.chat.max_messages.unwrap_or(DEFAULT_MAX_MESSAGES);
    let max_messages = if max_messages == 0 {
        warn!("max_messages = 0 is not usable; falling back to {DEFAULT_MAX_MESSAGES}");
        DEFAULT_MAX_MESSAGES
    } else {
        max_messages
    };

    ResolvedConfig {
        word_delay_ms: config.chat.word_delay_ms.unwrap_or(DEFAULT_WORD_DELAY_MS),
        punctuation_pause_ms: config
            .chat
            .punctuation_pause_ms
            .unwrap_or(DEFAULT_PUNCTUATION_PAUSE_MS),
        reply_delay_min_ms,
        reply_delay_max_ms,
        max_messages,
        max_input_chars: config
            .chat
            .max_input_chars
            .unwrap_or(DEFAULT_MAX_INPUT_CHARS),
        replies_file,
        plain,
    }
}

/// Bare filenames in the config are taken relative to `~/.banter/`;
/// absolute paths are used as-is.
fn resolve_replies_path(file: &String) -> PathBuf {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        return path;
    }
    match dirs::home_dir() {
        Some(home) => home.join(".banter").join(path),
        None => path,
    }
}
