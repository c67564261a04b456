//! # Core Conversation Logic
//!
//! This module contains Banter's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • ReplyBook (lookup)   │
//!                    │  • RevealSession        │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct — all conversation state in one place
//! - [`action`]: The `Action` enum — everything that can happen in the app
//! - [`reply`]: The canned reply book and its lookup rules
//! - [`reveal`]: Token-by-token reveal sessions for typed-out replies
//! - [`config`]: Settings with defaults → file → env → CLI resolution

pub mod action;
pub mod config;
pub mod reply;
pub mod reveal;
pub mod state;
