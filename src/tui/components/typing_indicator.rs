//! Transient "assistant is typing" row shown between submission and reply.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Padding, Paragraph, Widget};

/// Animation frames for the typing dots.
const FRAMES: [&str; 4] = ["●  ∙  ∙", "∙  ●  ∙", "∙  ∙  ●", "∙  ●  ∙"];

/// Bot-style bubble with animated dots. Lives outside the message history:
/// it is never counted against the retention ceiling and disappears the
/// moment the reply (or error) lands.
#[derive(Clone, Copy)]
pub struct TypingIndicator {
    pub spinner_frame: usize,
}

impl TypingIndicator {
    /// Fixed row height: one content line plus borders.
    pub const HEIGHT: u16 = 3;

    pub fn new(spinner_frame: usize) -> Self {
        Self { spinner_frame }
    }
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = Style::default().fg(Color::Blue).add_modifier(Modifier::DIM);
        let block = Block::bordered()
            .title("assistant")
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(style)
            .title_style(style)
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        let dots = FRAMES[self.spinner_frame % FRAMES.len()];
        Paragraph::new(dots)
            .style(Style::default().fg(Color::Blue))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn frames_cycle_without_panicking() {
        for frame in 0..10 {
            let backend = TestBackend::new(30, TypingIndicator::HEIGHT);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|f| f.render_widget(TypingIndicator::new(frame), f.area()))
                .unwrap();
        }
    }

    #[test]
    fn renders_role_title() {
        let backend = TestBackend::new(30, TypingIndicator::HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(TypingIndicator::new(0), f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("assistant"));
    }
}
