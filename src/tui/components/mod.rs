//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! Two patterns, mirroring React:
//!
//! - **Stateless (props-based)**: created fresh each frame with the data
//!   they need — `TitleBar`, `Message`, `TypingIndicator`, `Landing`.
//! - **Stateful (event-driven)**: hold local state and emit events —
//!   `InputBox` (buffer, cursor), `MessageListState` (scroll, layout cache).
//!
//! Each component file co-locates its state types, event types, rendering,
//! event handling, and tests, so one file tells the whole story. External
//! data always arrives as props, never by reaching into global state.

pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod title_bar;
pub mod typing_indicator;

pub use input_box::{InputBox, InputEvent};
pub use landing::Landing;
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
