//! # Reply Book
//!
//! The entire "backend" of Banter: a static mapping from exact lowercased
//! phrase to a canned reply, plus one default record used for every miss.
//!
//! The default record's text carries a `{input}` placeholder that is replaced
//! with the user's original text verbatim (not lowercased). Lookup never
//! fails — the default guarantees every input has a defined reply.
//!
//! The built-in book ships as an embedded JSON asset; a user-supplied file
//! can replace it via config or the `--replies` flag.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

/// Placeholder in the default template, substituted at most once.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Key of the fallback record inside the replies file.
const DEFAULT_KEY: &str = "_default";

/// Built-in reply book, embedded at compile time.
const EMBEDDED_REPLIES: &str = include_str!("../../assets/replies.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    /// Normal reply, revealed word-by-word.
    Bot,
    /// Simulated failure, displayed immediately without animation.
    Error,
}

/// A single canned reply. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplyRecord {
    pub kind: ReplyKind,
    pub text: String,
}

#[derive(Debug)]
pub enum ReplyBookError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// The `_default` record is missing from the file.
    MissingDefault,
}

impl fmt::Display for ReplyBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyBookError::Io(e) => write!(f, "reply book I/O error: {e}"),
            ReplyBookError::Parse(e) => write!(f, "reply book parse error: {e}"),
            ReplyBookError::MissingDefault => {
                write!(f, "reply book has no \"{DEFAULT_KEY}\" record")
            }
        }
    }
}

impl std::error::Error for ReplyBookError {}

/// Static phrase → reply mapping with a guaranteed default.
pub struct ReplyBook {
    entries: HashMap<String, ReplyRecord>,
    default: ReplyRecord,
}

impl ReplyBook {
    /// Parse a reply book from JSON.
    ///
    /// Keys are normalized to lowercase on load so that lookup only ever has
    /// to lowercase the query side.
    pub fn from_json(json: &str) -> Result<Self, ReplyBookError> {
        let raw: HashMap<String, ReplyRecord> =
            serde_json::from_str(json).map_err(ReplyBookError::Parse)?;

        let mut entries = HashMap::with_capacity(raw.len());
        let mut default = None;
        for (key, record) in raw {
            if key == DEFAULT_KEY {
                default = Some(record);
                continue;
            }
            let normalized = key.to_lowercase();
            if normalized != key {
                warn!("reply key {key:?} is not lowercase; matching on {normalized:?}");
            }
            entries.insert(normalized, record);
        }

        let default = default.ok_or(ReplyBookError::MissingDefault)?;
        let placeholders = default.text.matches(INPUT_PLACEHOLDER).count();
        if placeholders != 1 {
            warn!(
                "default reply contains {placeholders} \"{INPUT_PLACEHOLDER}\" placeholders; \
                 only the first occurrence is substituted"
            );
        }

        Ok(Self { entries, default })
    }

    /// Load a reply book from a user-supplied file.
    pub fn from_file(path: &Path) -> Result<Self, ReplyBookError> {
        let contents = fs::read_to_string(path).map_err(ReplyBookError::Io)?;
        let book = Self::from_json(&contents)?;
        info!(
            "Loaded reply book from {} ({} phrases)",
            path.display(),
            book.entries.len()
        );
        Ok(book)
    }

    /// The built-in book. The embedded asset is validated by tests, so a
    /// parse failure here means a broken build; degrade to a minimal book
    /// rather than crashing.
    pub fn embedded() -> Self {
        Self::from_json(EMBEDDED_REPLIES).unwrap_or_else(|e| {
            log::error!("embedded reply book is invalid: {e}");
            Self {
                entries: HashMap::new(),
                default: ReplyRecord {
                    kind: ReplyKind::Bot,
                    text: format!("I received your message: \"{INPUT_PLACEHOLDER}\"."),
                },
            }
        })
    }

    /// Resolve user input to a reply record.
    ///
    /// Exact match on the lowercased input only — no fuzzy or substring
    /// matching. On a miss, the default record is returned with its
    /// placeholder replaced by the original (non-normalized) input.
    pub fn resolve(&self, user_text: &str) -> ReplyRecord {
        let key = user_text.to_lowercase();
        match self.entries.get(&key) {
            Some(record) => record.clone(),
            None => ReplyRecord {
                kind: self.default.kind,
                text: self.default.text.replacen(INPUT_PLACEHOLDER, user_text, 1),
            },
        }
    }

    /// Known phrases, for the landing view's suggestions.
    pub fn phrases(&self) -> Vec<&str> {
        let mut phrases: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        phrases.sort_unstable();
        phrases
    }
}
