//! # InputBox Component
//!
//! Multi-line composer at the bottom of the screen.
//!
//! ## Responsibilities
//!
//! - Capture text input and basic editing (backspace, delete, cursor
//!   movement, paste, Shift+Enter line breaks)
//! - Handle submission (Enter) — trimmed, non-empty only
//! - Auto-resize with content, up to a fixed number of visible rows
//! - Lock while a reply is pending: the controller disables the composer
//!   until the exchange finishes
//!
//! The buffer and cursor are internal state; `locked` and the character
//! ceiling are props from the application state.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Content rows shown before the composer stops growing.
const MAX_VISIBLE_LINES: usize = 5;
/// Top + bottom border.
const VERTICAL_OVERHEAD: u16 = 2;
/// Fraction of the ceiling past which the character counter appears.
const COUNTER_THRESHOLD_NUM: usize = 4;
const COUNTER_THRESHOLD_DEN: usize = 5;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text content changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (internal state)
    pub buffer: String,
    /// Disabled while a reply is pending (prop)
    pub locked: bool,
    /// Character ceiling, used for the counter display (prop)
    pub max_chars: usize,
    /// Byte offset of the cursor within `buffer`
    cursor_pos: usize,
}

impl InputBox {
    pub fn new(max_chars: usize) -> Self {
        Self {
            buffer: String::new(),
            locked: false,
            max_chars,
            cursor_pos: 0,
        }
    }

    /// Calculate required height for the current buffer, clamped to the
    /// visible-row limit.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(2);
        let lines = wrap_lines(&self.buffer, inner).len().min(MAX_VISIBLE_LINES);
        lines.max(1) as u16 + VERTICAL_OVERHEAD
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }
}

/// Wrap text for display: manual newlines are preserved, long lines break
/// at the given width. Options mirror ratatui's paragraph wrapping so the
/// pre-wrapped text renders 1:1.
fn wrap_lines(text: &str, width: u16) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);

    let mut out = Vec::new();
    for line in text.split('\n') {
        if line.is_empty() {
            out.push(String::new());
            continue;
        }
        for piece in textwrap::wrap(line, &options) {
            out.push(piece.into_owned());
        }
    }
    out
}

/// Largest byte index ≤ `pos` that sits on a char boundary after stepping
/// back one character.
fn prev_char_boundary(s: &str, pos: usize) -> usize {
    let mut p = pos - 1;
    while !s.is_char_boundary(p) {
        p -= 1;
    }
    p
}

/// Byte index just past the character starting at `pos`.
fn next_char_boundary(s: &str, pos: usize) -> usize {
    let mut p = pos + 1;
    while p < s.len() && !s.is_char_boundary(p) {
        p += 1;
    }
    p
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2);
        let lines = wrap_lines(&self.buffer, inner_width);

        // Send affordance: dim while locked or while a submit would be a
        // no-op (empty / whitespace-only buffer).
        let sendable = !self.locked && !self.buffer.trim().is_empty();
        let border_style = if self.locked {
            Style::default().fg(Color::DarkGray)
        } else if sendable {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Green).add_modifier(Modifier::DIM)
        };

        let title = if self.locked { "Message (waiting…)" } else { "Message" };
        let mut block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .title(title);

        // Character counter once the buffer approaches the ceiling.
        let chars = self.char_count();
        if chars * COUNTER_THRESHOLD_DEN >= self.max_chars * COUNTER_THRESHOLD_NUM {
            let over = chars > self.max_chars;
            let counter_style = if over {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            block = block.title_bottom(
                Line::styled(format!(" {chars}/{} ", self.max_chars), counter_style)
                    .right_aligned(),
            );
        }

        // Show the tail when content exceeds the visible rows; the cursor
        // lives at or near the end during normal typing.
        let first_visible = lines.len().saturating_sub(MAX_VISIBLE_LINES);
        let visible = lines[first_visible..].join("\n");

        let input = Paragraph::new(visible)
            .block(block)
            .style(Style::default().fg(Color::Green));
        frame.render_widget(input, area);

        if !self.locked {
            let prefix_lines = wrap_lines(&self.buffer[..self.cursor_pos], inner_width);
            let row = prefix_lines.len().saturating_sub(1);
            let col = prefix_lines.last().map(|l| l.width()).unwrap_or(0);
            if row >= first_visible {
                let x = area.x + 1 + (col as u16).min(inner_width.saturating_sub(1));
                let y = area.y + 1 + (row - first_visible) as u16;
                frame.set_cursor_position((x, y));
            }
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        // Input affordances are disabled while a reply is pending.
        if self.locked {
            return None;
        }

        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor_pos, *c);
                self.cursor_pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(self.cursor_pos, text);
                self.cursor_pos += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor_pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor_pos);
                    self.buffer.drain(prev..self.cursor_pos);
                    self.cursor_pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor_pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor_pos);
                    self.buffer.drain(self.cursor_pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor_pos > 0 {
                    self.cursor_pos = prev_char_boundary(&self.buffer, self.cursor_pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor_pos < self.buffer.len() {
                    self.cursor_pos = next_char_boundary(&self.buffer, self.cursor_pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor_pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor_pos != line_start).then(|| {
                    self.cursor_pos = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor_pos..]
                    .find('\n')
                    .map(|i| self.cursor_pos + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor_pos != line_end).then(|| {
                    self.cursor_pos = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                if self.char_count() > self.max_chars {
                    // Keep the draft: the controller rejects the submission
                    // with a notice and the user gets to edit it down.
                    return Some(InputEvent::Submit(self.buffer.clone()));
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor_pos = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_input_box_new() {
        let input = InputBox::new(2000);
        assert!(input.buffer.is_empty());
        assert!(!input.locked);
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new(2000);

        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('b')),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(input.buffer, "ab");

        assert_eq!(
            input.handle_event(&TuiEvent::Backspace),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = InputBox::new(2000);
        input.handle_event(&TuiEvent::InputChar('é'));
        input.handle_event(&TuiEvent::InputChar('x'));
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "x");
    }

    #[test]
    fn test_submit() {
        let mut input = InputBox::new(2000);
        input.buffer = "hello".to_string();

        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "hello"),
            other => panic!("Expected Submit event, got {other:?}"),
        }
        assert!(input.buffer.is_empty(), "Buffer should be cleared after submit");
    }

    #[test]
    fn test_over_length_submit_keeps_the_draft() {
        let mut input = InputBox::new(5);
        input.buffer = "too long".to_string();

        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "too long"),
            other => panic!("Expected Submit event, got {other:?}"),
        }
        assert_eq!(input.buffer, "too long", "rejected draft must survive");
    }

    #[test]
    fn test_whitespace_only_submit_is_ignored() {
        let mut input = InputBox::new(2000);
        input.buffer = "  \n ".to_string();
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        // Buffer stays; the user may still be composing.
        assert_eq!(input.buffer, "  \n ");
    }

    #[test]
    fn test_locked_box_ignores_everything() {
        let mut input = InputBox::new(2000);
        input.buffer = "hello".to_string();
        input.locked = true;

        assert_eq!(input.handle_event(&TuiEvent::InputChar('x')), None);
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "hello");
    }

    #[test]
    fn test_newline_grows_height_up_to_cap() {
        let mut input = InputBox::new(2000);
        assert_eq!(input.calculate_height(40), 3);

        input.buffer = "a\nb\nc".to_string();
        assert_eq!(input.calculate_height(40), 5);

        input.buffer = "a\nb\nc\nd\ne\nf\ng".to_string();
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_LINES as u16 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_wrap_lines_preserves_manual_breaks() {
        assert_eq!(wrap_lines("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_lines("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_lines_breaks_long_words() {
        let lines = wrap_lines("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_render_shows_waiting_title_when_locked() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut input = InputBox::new(2000);
        input.locked = true;

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("waiting"));
    }

    #[test]
    fn test_render_shows_counter_near_ceiling() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut input = InputBox::new(10);
        input.buffer = "12345678".to_string();

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("8/10"));
    }
}
