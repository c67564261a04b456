//! # MessageList Component
//!
//! Scrollable, scroll-following view of the conversation.
//!
//! ## Responsibilities
//!
//! - Display the bounded message history plus the transient typing indicator
//! - Stick to the bottom while new content arrives; manual scrolling
//!   disengages, scrolling back to the bottom re-pins
//! - Cache per-bubble heights so layout doesn't re-render markdown for every
//!   settled message on every frame
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message deque
//! (props), aligning with Ratatui's `StatefulWidget` pattern.

use std::collections::VecDeque;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::Bubble;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::components::typing_indicator::TypingIndicator;
use crate::tui::event::TuiEvent;
use crate::tui::renderer::Renderer;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let total: u16 = self.layout.heights.iter().sum();
        let max_y = total.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll if the user has scrolled back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let total: u16 = self.layout.heights.iter().sum();
        let max_y = total.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for MessageListState {
    type Event = (); // scroll handling is internal

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            _ => None,
        }
    }
}

/// Cached per-bubble heights.
///
/// Settled bubbles never change height at a fixed width, so only new bubbles
/// and the one being revealed are measured each frame. FIFO pruning shifts
/// every index, which the `dropped_count` epoch detects even when the count
/// itself didn't shrink between two frames.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
    dropped_epoch: u64,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            message_count: 0,
            content_width: 0,
            dropped_epoch: 0,
        }
    }

    /// How many cached heights can be reused for this frame.
    fn reusable_count(
        &self,
        message_count: usize,
        content_width: u16,
        dropped_epoch: u64,
        revealing: bool,
    ) -> usize {
        if self.content_width != content_width
            || self.dropped_epoch != dropped_epoch
            || message_count < self.message_count
        {
            return 0;
        }
        // The bubble under reveal grows every step; re-measure it.
        if revealing {
            message_count.saturating_sub(1)
        } else {
            message_count
        }
    }

    fn update_metadata(&mut self, message_count: usize, content_width: u16, dropped_epoch: u64) {
        self.message_count = message_count;
        self.content_width = content_width;
        self.dropped_epoch = dropped_epoch;
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub bubbles: &'a VecDeque<Bubble>,
    pub renderer: &'a dyn Renderer,
    /// Shows the typing indicator row after the last bubble.
    pub awaiting_reply: bool,
    /// The last bubble is an in-progress reveal.
    pub revealing: bool,
    pub dropped_epoch: u64,
    pub spinner_frame: usize,
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let num_bubbles = self.bubbles.len();

        // 1. Update layout cache (internal mutation)
        let reusable = self.state.layout.reusable_count(
            num_bubbles,
            content_width,
            self.dropped_epoch,
            self.revealing,
        );
        let layout = &mut self.state.layout;
        layout.heights.truncate(reusable.min(layout.heights.len()));
        for bubble in self.bubbles.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(Message::calculate_height(bubble, self.renderer, content_width));
        }
        layout.update_metadata(num_bubbles, content_width, self.dropped_epoch);

        let mut total_height: u16 = self.state.layout.heights.iter().sum();
        if self.awaiting_reply {
            total_height += TypingIndicator::HEIGHT;
        }

        // 2. Clamp scroll offset unless we're about to snap to the bottom.
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        // 3. Render every bubble into the scroll canvas.
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for (i, bubble) in self.bubbles.iter().enumerate() {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);
            let is_revealing = self.revealing && i == num_bubbles - 1;
            scroll_view.render_widget(Message::new(bubble, self.renderer, is_revealing), rect);
            y_offset += height;
        }

        if self.awaiting_reply {
            let rect = Rect::new(0, y_offset, content_width, TypingIndicator::HEIGHT);
            scroll_view.render_widget(TypingIndicator::new(self.spinner_frame), rect);
        }

        // Auto-scroll (mutation) — follow the newest content while pinned.
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::renderer::MarkdownRenderer;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn bubbles(contents: &[&str]) -> VecDeque<Bubble> {
        contents.iter().map(|c| Bubble::user(*c)).collect()
    }

    fn draw(
        state: &mut MessageListState,
        deque: &VecDeque<Bubble>,
        awaiting: bool,
        revealing: bool,
        epoch: u64,
    ) -> String {
        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let mut list = MessageList {
                    state,
                    bubbles: deque,
                    renderer: &MarkdownRenderer,
                    awaiting_reply: awaiting,
                    revealing,
                    dropped_epoch: epoch,
                    spinner_frame: 0,
                };
                list.render(f, f.area());
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
    fn renders_bubbles_and_caches_heights() {
        let mut state = MessageListState::new();
        let deque = bubbles(&["first", "second"]);
        let text = draw(&mut state, &deque, false, false, 0);
        assert!(text.contains("first"));
        assert!(text.contains("second"));
        assert_eq!(state.layout.heights.len(), 2);
    }

    #[test]
    fn typing_indicator_is_shown_while_awaiting() {
        let mut state = MessageListState::new();
        let deque = bubbles(&["question"]);
        let text = draw(&mut state, &deque, true, false, 0);
        assert!(text.contains("assistant"));
    }

    #[test]
    fn cache_invalidates_when_indices_shift() {
        let mut state = MessageListState::new();
        let long = bubbles(&["aaa", "bbb\nbbb", "ccc"]);
        draw(&mut state, &long, false, false, 0);
        let before = state.layout.heights.clone();

        // Same count, but pruning shifted everything by one.
        let shifted = bubbles(&["bbb\nbbb", "ccc", "ddd"]);
        draw(&mut state, &shifted, false, false, 1);
        let after = state.layout.heights.clone();

        assert_eq!(after.len(), 3);
        assert_ne!(before, after);
        assert_eq!(after[0], before[1]);
    }

    #[test]
    fn revealing_bubble_is_remeasured() {
        let mut state = MessageListState::new();
        let mut deque = bubbles(&["question"]);
        deque.push_back(Bubble::bot("one line"));
        draw(&mut state, &deque, false, true, 0);
        let h_before = state.layout.heights[1];

        deque.back_mut().unwrap().content = "one line\nand another".into();
        draw(&mut state, &deque, false, true, 0);
        let h_after = state.layout.heights[1];
        assert_eq!(h_after, h_before + 1);
    }

    #[test]
    fn scroll_up_disengages_stick_to_bottom() {
        let mut state = MessageListState::new();
        assert!(state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
    }

    #[test]
    fn scrolling_back_down_repins() {
        let mut state = MessageListState::new();
        let deque = bubbles(&["only message"]);
        draw(&mut state, &deque, false, false, 0);

        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        // Content fits the viewport, so any downward scroll lands at bottom.
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
    }
}
