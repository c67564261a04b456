//! Reply rendering capability.
//!
//! The display pipeline is injected, not probed per call: `select()` picks an
//! implementation once at startup and every bubble renders through it for the
//! life of the session. The full pipeline parses the constrained Markdown
//! dialect; the fallback renders literal text with no structural
//! interpretation. Falling back is a diagnostic note, never a user-facing
//! error.

use std::sync::Arc;

use log::warn;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Text};

use crate::tui::markdown;

pub trait Renderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Convert raw reply text into styled display text. Must be
    /// deterministic: the reveal animator re-renders growing prefixes of the
    /// same reply and expects stable output for equal input.
    fn render(&self, text: &str, base_fg: Color) -> Text<'static>;
}

/// Full pipeline: constrained Markdown with sanitizing allow-list semantics.
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn render(&self, text: &str, base_fg: Color) -> Text<'static> {
        markdown::render(text, base_fg)
    }
}

/// Degraded pipeline: every line is literal text, no markup interpretation.
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn render(&self, text: &str, base_fg: Color) -> Text<'static> {
        let style = Style::default().fg(base_fg);
        Text::from(
            text.lines()
                .map(|line| Line::styled(line.to_owned(), style))
                .collect::<Vec<_>>(),
        )
    }
}

/// Select the display pipeline once, at construction.
pub fn select(plain: bool) -> Arc<dyn Renderer> {
    if plain {
        warn!("Markdown rendering disabled; replies will display as literal text");
        Arc::new(PlainRenderer)
    } else {
        Arc::new(MarkdownRenderer)
    }
}
