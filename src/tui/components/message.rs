use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::state::{Bubble, Source};
use crate::tui::component::Component;
use crate::tui::renderer::Renderer;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A stateless component that renders a single chat bubble.
///
/// `Message` is a transient component: created fresh each frame with the data
/// it needs. The display pipeline is a prop — user and bot bubbles render
/// through the injected [`Renderer`], error bubbles always display their text
/// literally (simulated failures are never interpreted as markup).
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts rendered height with
/// `Paragraph::line_count` over the same rendered text the widget draws, so
/// the parent `MessageList` can lay out scroll positions without rendering.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub bubble: &'a Bubble,
    pub renderer: &'a dyn Renderer,
    /// True while the reveal animation is still filling this bubble.
    pub is_revealing: bool,
}

impl<'a> Message<'a> {
    pub fn new(bubble: &'a Bubble, renderer: &'a dyn Renderer, is_revealing: bool) -> Self {
        Self {
            bubble,
            renderer,
            is_revealing,
        }
    }

    fn role(source: Source) -> &'static str {
        match source {
            Source::User => "you",
            Source::Bot => "assistant",
            Source::Error => "✖ error",
        }
    }

    fn source_style(source: Source) -> Style {
        match source {
            Source::User => Style::default().fg(Color::Green),
            Source::Bot => Style::default().fg(Color::Blue),
            Source::Error => Style::default().fg(Color::Red),
        }
    }

    /// The styled text this bubble displays.
    fn display_text(bubble: &Bubble, renderer: &dyn Renderer) -> Text<'static> {
        let fg = Self::source_style(bubble.source).fg.unwrap_or(Color::Reset);
        match bubble.source {
            // Error text is displayed verbatim, never parsed.
            Source::Error => Text::from(
                bubble
                    .content
                    .lines()
                    .map(|l| Line::styled(l.to_owned(), Style::default().fg(fg)))
                    .collect::<Vec<_>>(),
            ),
            Source::User | Source::Bot => renderer.render(&bubble.content, fg),
        }
    }

    /// Calculate the height required for this bubble at the given width.
    ///
    /// Must agree with the widget's actual rendering, so it wraps the same
    /// rendered text through the same `Paragraph` configuration.
    pub fn calculate_height(bubble: &Bubble, renderer: &dyn Renderer, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }

        let text = Self::display_text(bubble, renderer);
        let lines = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .line_count(content_width) as u16;
        lines.max(1) + VERTICAL_OVERHEAD
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = Self::source_style(self.bubble.source);

        // Active reveal gets a full-intensity border; settled bubbles dim.
        let border_style = if self.is_revealing {
            style
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .title(Self::role(self.bubble.source))
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .title_bottom(
                Line::styled(
                    format!(" {} ", self.bubble.stamp),
                    Style::default().fg(Color::DarkGray),
                )
                .right_aligned(),
            )
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let paragraph = Paragraph::new(Self::display_text(self.bubble, self.renderer))
            .wrap(Wrap { trim: false });
        paragraph.render(inner_area, buf);
    }
}

/// `Message` is stateless, so the `&mut self` required by the trait is a
/// no-op; rendering is delegated to the [`Widget`] implementation.
impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::renderer::{MarkdownRenderer, PlainRenderer};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn calculate_height_single_line() {
        let bubble = Bubble::user("Hello");
        assert_eq!(
            Message::calculate_height(&bubble, &MarkdownRenderer, 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_empty_slot_reserves_a_row() {
        // Bot bubbles start empty while the reveal session fills them.
        let bubble = Bubble::bot("");
        assert_eq!(
            Message::calculate_height(&bubble, &MarkdownRenderer, 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let bubble = Bubble::user("Hello world");
        assert_eq!(Message::calculate_height(&bubble, &MarkdownRenderer, 0), 1);
        assert_eq!(
            Message::calculate_height(&bubble, &MarkdownRenderer, HORIZONTAL_OVERHEAD),
            1
        );
    }

    #[test]
    fn calculate_height_grows_with_line_breaks() {
        let one = Bubble::bot("one line");
        let three = Bubble::bot("one\ntwo\nthree");
        let h1 = Message::calculate_height(&one, &MarkdownRenderer, 80);
        let h3 = Message::calculate_height(&three, &MarkdownRenderer, 80);
        assert_eq!(h3, h1 + 2);
    }

    #[test]
    fn render_shows_role_and_content() {
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let bubble = Bubble::user("Hello there");

        terminal
            .draw(|f| {
                let mut msg = Message::new(&bubble, &MarkdownRenderer, false);
                Component::render(&mut msg, f, f.area());
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("you"));
        assert!(text.contains("Hello there"));
    }

    #[test]
    fn error_bubble_displays_markup_literally() {
        let backend = TestBackend::new(50, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let bubble = Bubble::error("failed **hard**");

        terminal
            .draw(|f| {
                let mut msg = Message::new(&bubble, &MarkdownRenderer, false);
                Component::render(&mut msg, f, f.area());
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("**hard**"), "error text must stay verbatim");
    }

    #[test]
    fn bot_bubble_renders_through_the_injected_pipeline() {
        let backend = TestBackend::new(50, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let bubble = Bubble::bot("a **b** c");

        terminal
            .draw(|f| {
                let mut msg = Message::new(&bubble, &PlainRenderer, false);
                Component::render(&mut msg, f, f.area());
            })
            .unwrap();

        // Plain pipeline keeps the asterisks.
        assert!(buffer_text(&terminal).contains("**b**"));
    }
}
