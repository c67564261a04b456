//! Single-row status bar: app name, display pipeline, status text, and the
//! message count against its ceiling.
//!
//! The status text doubles as the announcement surface: typing-indicator and
//! error updates land here as well as in the log.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub struct TitleBar<'a> {
    pub status: &'a str,
    pub renderer_name: &'a str,
    pub message_count: usize,
    pub max_messages: usize,
}

impl<'a> Component for TitleBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("Banter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
        ];
        if self.renderer_name != "markdown" {
            spans.push(Span::styled(
                format!("[{}] ", self.renderer_name),
                Style::default().fg(Color::Yellow),
            ));
        }
        if !self.status.is_empty() {
            spans.push(Span::styled(
                format!("| {}", self.status),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        let count = format!("{}/{}", self.message_count, self.max_messages);
        let count_width = count.len() as u16;
        if area.width > count_width {
            let right = Rect {
                x: area.x + area.width - count_width,
                y: area.y,
                width: count_width,
                height: 1,
            };
            frame.render_widget(
                Paragraph::new(Span::styled(count, Style::default().fg(Color::DarkGray))),
                right,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(status: &str, renderer_name: &str, count: usize, max: usize) -> String {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let mut bar = TitleBar {
                    status,
                    renderer_name,
                    message_count: count,
                    max_messages: max,
                };
                bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn shows_status_and_count() {
        let text = draw("Assistant is typing…", "markdown", 3, 200);
        assert!(text.contains("Banter"));
        assert!(text.contains("Assistant is typing"));
        assert!(text.contains("3/200"));
    }

    #[test]
    fn plain_pipeline_is_badged() {
        let text = draw("", "plain", 0, 200);
        assert!(text.contains("[plain]"));
        let markdown = draw("", "markdown", 0, 200);
        assert!(!markdown.contains("[markdown]"));
    }
}
