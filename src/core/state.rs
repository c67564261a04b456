//! # Application State
//!
//! Core conversation state for Banter. This module contains domain logic
//! only - no TUI-specific types. Presentation state lives in the `tui`
//! module.
//!
//! ```text
//! App
//! ├── replies: ReplyBook          // the entire "backend"
//! ├── messages: VecDeque<Bubble>  // bounded display history
//! ├── phase: Phase                // Idle / AwaitingReply / Revealing
//! ├── pending_reply: Option<..>   // resolved reply awaiting its timer
//! ├── reveal_seq: u64             // generation counter for reveal sessions
//! ├── is_first_message: bool      // landing view still visible
//! ├── status_message: String      // status bar / live-region text
//! └── limits: ChatLimits          // message ceiling, input ceiling
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::collections::VecDeque;

use crate::core::config::ResolvedConfig;
use crate::core::reply::{ReplyBook, ReplyRecord};

/// Number of leading words kept when summarizing a bubble for its label.
const LABEL_WORDS: usize = 10;

/// Who a bubble belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    User,
    Bot,
    Error,
}

/// One displayed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub source: Source,
    pub content: String,
    /// Creation time, `HH:MM`.
    pub stamp: String,
}

impl Bubble {
    fn new(source: Source, content: impl Into<String>) -> Self {
        Self {
            source,
            content: content.into(),
            stamp: chrono::Local::now().format("%H:%M").to_string(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Source::User, content)
    }

    /// Bot bubbles start empty; the reveal session fills them in.
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Source::Bot, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Source::Error, content)
    }

    /// Human-readable summary: role prefix plus the first few words.
    /// Used for the activity log and the status line announcements.
    pub fn label(&self) -> String {
        let prefix = match self.source {
            Source::User => "You",
            Source::Bot => "Assistant",
            Source::Error => "Error",
        };
        let mut words: Vec<&str> = self.content.split_whitespace().take(LABEL_WORDS + 1).collect();
        let truncated = words.len() > LABEL_WORDS;
        words.truncate(LABEL_WORDS);
        let summary = words.join(" ");
        if truncated {
            format!("{prefix}: {summary}…")
        } else {
            format!("{prefix}: {summary}")
        }
    }
}

/// Conversation state machine.
///
/// `Submitting` from the original design is the synchronous body of the
/// submit action, so it never appears between loop iterations. The `seq`
/// payloads tie timer and reveal actions to the session that scheduled
/// them; a stale `seq` is ignored by `update()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Typing indicator shown, randomized reply timer pending.
    AwaitingReply { seq: u64 },
    /// A reveal session is animating the latest bot bubble.
    Revealing { seq: u64 },
}

impl Phase {
    pub fn is_processing(self) -> bool {
        self != Phase::Idle
    }
}

/// Hard ceilings from config.
#[derive(Debug, Clone, Copy)]
pub struct ChatLimits {
    /// Maximum retained messages; oldest dropped first.
    pub max_messages: usize,
    /// Maximum accepted input length, in characters.
    pub max_input_chars: usize,
}

pub struct App {
    pub replies: ReplyBook,
    pub messages: VecDeque<Bubble>,
    pub phase: Phase,
    /// Resolved reply waiting for the pre-reply delay to elapse.
    pub pending_reply: Option<ReplyRecord>,
    /// Bumped on every accepted submission. Actions carrying an older value
    /// belong to a superseded session and are dropped.
    pub reveal_seq: u64,
    pub is_first_message: bool,
    pub status_message: String,
    pub limits: ChatLimits,
    /// Total messages evicted by pruning. Lets the display layer detect that
    /// indices shifted even when the count did not shrink between frames.
    pub dropped_count: u64,
}

impl App {
    pub fn new(replies: ReplyBook, limits: ChatLimits) -> Self {
        Self {
            replies,
            messages: VecDeque::new(),
            phase: Phase::Idle,
            pending_reply: None,
            reveal_seq: 0,
            is_first_message: true,
            status_message: String::from("Welcome to Banter!"),
            limits,
            dropped_count: 0,
        }
    }

    pub fn from_config(replies: ReplyBook, config: &ResolvedConfig) -> Self {
        Self::new(
            replies,
            ChatLimits {
                max_messages: config.max_messages,
                max_input_chars: config.max_input_chars,
            },
        )
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_processing(&self) -> bool {
        self.phase.is_processing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn new_app_defaults() {
        let app = test_app();
        assert_eq!(app.phase, Phase::Idle);
        assert!(!app.is_processing());
        assert!(app.is_first_message);
        assert_eq!(app.message_count(), 0);
        assert!(app.pending_reply.is_none());
    }

    #[test]
    fn label_keeps_first_ten_words() {
        let bubble = Bubble::user("one two three four five six seven eight nine ten eleven");
        assert_eq!(
            bubble.label(),
            "You: one two three four five six seven eight nine ten…"
        );
    }

    #[test]
    fn label_short_content_is_untruncated() {
        let bubble = Bubble::bot("short reply");
        assert_eq!(bubble.label(), "Assistant: short reply");
    }

    #[test]
    fn label_collapses_internal_whitespace() {
        let bubble = Bubble::error("bad\n\nthing   happened");
        assert_eq!(bubble.label(), "Error: bad thing happened");
    }
}
