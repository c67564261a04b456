//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::reply::ReplyBook;
use crate::core::state::{App, ChatLimits};

/// Creates a test App with the embedded reply book and default ceilings.
pub fn test_app() -> App {
    test_app_with_limits(200, 2000)
}

/// Creates a test App with explicit message and input ceilings.
pub fn test_app_with_limits(max_messages: usize, max_input_chars: usize) -> App {
    App::new(
        ReplyBook::embedded(),
        ChatLimits {
            max_messages,
            max_input_chars,
        },
    )
}
