//! # Landing Component
//!
//! Welcome view shown while the conversation is empty: name, a rotating
//! tagline carousel, and suggested phrases drawn from the reply book. It
//! disappears permanently after the first accepted message.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

/// Carousel slides, advanced on a fixed interval by the run loop.
const TAGLINES: [&str; 3] = [
    "Replies render as rich Markdown",
    "Watch answers typed out word by word",
    "Every reply is canned — no network, no model",
];

pub struct Landing<'a> {
    pub suggestions: &'a [String],
    pub carousel_index: usize,
}

impl<'a> Landing<'a> {
    pub fn new(suggestions: &'a [String], carousel_index: usize) -> Self {
        Self {
            suggestions,
            carousel_index,
        }
    }
}

impl<'a> Component for Landing<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();

        lines.push(Line::from(Span::styled(
            "Banter",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::default());

        let tagline = TAGLINES[self.carousel_index % TAGLINES.len()];
        lines.push(Line::from(Span::styled(
            tagline,
            Style::default().fg(Color::Blue).add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::default());

        if !self.suggestions.is_empty() {
            lines.push(Line::from(Span::styled(
                "Try one of these:",
                Style::default().fg(Color::DarkGray),
            )));
            for phrase in self.suggestions {
                lines.push(Line::from(Span::styled(
                    format!("\u{201c}{phrase}\u{201d}"),
                    Style::default().fg(Color::Green),
                )));
            }
        }

        let height = lines.len() as u16;
        let [centered] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, centered);
    }
}
