//! # Reveal Sessions
//!
//! Token-by-token disclosure of a complete reply, simulating live typing.
//!
//! A reply is split into tokens — maximal runs of either non-whitespace or
//! whitespace characters — so that rejoining the tokens in order reproduces
//! the source text exactly. Each step appends one token to the accumulated
//! text and names the pause to apply before the next step: a longer
//! punctuation pause when the token ends a clause, the inter-word delay
//! otherwise.
//!
//! This module is pure state. The async driver that turns steps into timed
//! [`Action`](crate::core::action::Action)s lives in `tui::runtime`.

/// Trailing characters that earn the longer punctuation pause.
const PUNCTUATION: [char; 5] = ['.', '!', '?', ',', ';'];

/// How long to wait after a revealed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Ordinary inter-word delay.
    Word,
    /// Longer pause after clause-ending punctuation.
    Punctuation,
}

/// One step of an in-progress reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealStep {
    /// Snapshot of the accumulated text, a strict prefix of the source.
    pub accumulated: String,
    /// Pause to apply before the next step.
    pub pause: Pause,
}

/// Split text into alternating content and whitespace runs.
///
/// Whitespace is preserved exactly — no run is dropped or collapsed — so
/// `tokens.concat() == text` holds for every input.
pub fn split_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_whitespace = None;

    for ch in text.chars() {
        let ws = ch.is_whitespace();
        if in_whitespace != Some(ws) && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        in_whitespace = Some(ws);
        current.push(ch);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Pacing rule: punctuation pause when the trimmed token ends in `. ! ? , ;`.
pub fn pause_after(token: &str) -> Pause {
    match token.trim().chars().last() {
        Some(last) if PUNCTUATION.contains(&last) => Pause::Punctuation,
        _ => Pause::Word,
    }
}

/// Transient state for one in-progress reveal animation.
///
/// Created when a bot reply begins animating; dropped when the last token is
/// consumed or the session is superseded by a newer one.
pub struct RevealSession {
    source: String,
    tokens: Vec<String>,
    cursor: usize,
    accumulated: String,
}

impl RevealSession {
    pub fn new(text: &str) -> Self {
        Self {
            source: text.to_string(),
            tokens: split_tokens(text),
            cursor: 0,
            accumulated: String::with_capacity(text.len()),
        }
    }

    /// The full text being revealed.
    ///
    /// Completion must display this, not the token reconstruction, so the
    /// final render is byte-identical to rendering the source directly.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Consume the next token and return the step to emit, or `None` once
    /// every token has been revealed.
    pub fn advance(&mut self) -> Option<RevealStep> {
        let token = self.tokens.get(self.cursor)?;
        self.accumulated.push_str(token);
        self.cursor += 1;
        Some(RevealStep {
            accumulated: self.accumulated.clone(),
            pause: pause_after(token),
        })
    }
}
