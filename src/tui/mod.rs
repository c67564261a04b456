//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm. Core
//! conversation logic stays UI-free so a different adapter could replace
//! this one.
//!
//! ## Scheduling
//!
//! One logical thread of control: this loop owns all state. Background
//! tokio tasks (the pre-reply timer, the reveal driver) never touch state —
//! they send `Action`s over a channel, consumed here in send order. A task
//! superseded by a newer session is aborted, and its already-sent actions
//! carry a stale sequence number that `update()` ignores.
//!
//! ## Redraw Strategy
//!
//! Conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (landing carousel, typing indicator, reveal): draws every
//!   ~80ms for smooth animation.
//! - **Idle**: sleeps up to 500ms, only redraws on events.

mod component;
mod components;
mod event;
pub mod markdown;
pub mod renderer;
pub mod runtime;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info};
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::reply::ReplyBook;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::renderer::Renderer;

/// Seconds each landing tagline stays on screen.
const CAROUSEL_INTERVAL_SECS: u64 = 3;

/// TUI-specific presentation state (not part of core conversation logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Display pipeline, selected once at startup.
    pub renderer: Arc<dyn Renderer>,
    /// Suggested phrases for the landing view.
    pub suggestions: Vec<String>,
    // Animation state
    pub spinner_frame: usize,
    pub carousel_index: usize,
}

impl TuiState {
    pub fn new(renderer: Arc<dyn Renderer>, suggestions: Vec<String>, max_chars: usize) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(max_chars),
            renderer,
            suggestions,
            spinner_frame: 0,
            carousel_index: 0,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Enable the Kitty keyboard protocol unconditionally (allows
        // Shift+Enter detection). Terminals without it ignore the flags.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
        );
    }
}

pub fn run(config: ResolvedConfig, replies: ReplyBook) -> std::io::Result<()> {
    let suggestions: Vec<String> = replies.phrases().iter().map(|p| p.to_string()).collect();
    let mut app = App::from_config(replies, &config);
    let mut tui = TuiState::new(
        renderer::select(config.plain),
        suggestions,
        config.max_input_chars,
    );

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Abort handles for the current session's tasks (superseded on each new
    // submission, dropped on quit)
    let mut active_abort_handles: Vec<AbortHandle> = Vec::new();

    // Animation timer
    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        // Sync InputBox props with App state
        tui.input_box.locked = app.is_processing();

        // Animations run while a reply is pending or the landing carousel
        // is visible
        let animating = app.is_processing() || (app.is_first_message && app.messages.is_empty());
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let elapsed = start_time.elapsed();
            tui.spinner_frame = (elapsed.as_secs_f32() * 6.0) as usize;
            tui.carousel_index = (elapsed.as_secs() / CAROUSEL_INTERVAL_SECS) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => {}

                // Ctrl+C always quits
                TuiEvent::ForceQuit => {
                    if update(&mut app, Action::Quit) == Effect::Quit {
                        should_quit = true;
                    }
                }

                // Scroll events always go to the MessageList
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.message_list.handle_event(&event);
                }

                // Everything else belongs to the composer. The InputBox is
                // locked while a reply is pending, so editing and submission
                // are no-ops until the exchange completes.
                _ => {
                    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                        let effect = update(&mut app, Action::Submit(text));
                        apply_effect(effect, &config, &tx, &mut active_abort_handles, &mut should_quit);
                    }
                }
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (reply timer, reveal steps)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            apply_effect(effect, &config, &tx, &mut active_abort_handles, &mut should_quit);
        }
        if should_quit {
            break;
        }
    }

    // Tear down: stop any in-flight session so no further callbacks run
    for handle in active_abort_handles.drain(..) {
        handle.abort();
    }

    ratatui::restore();
    Ok(())
}

/// Execute the side effect a state transition asked for.
fn apply_effect(
    effect: Effect,
    config: &ResolvedConfig,
    tx: &mpsc::Sender<Action>,
    active_abort_handles: &mut Vec<AbortHandle>,
    should_quit: &mut bool,
) {
    match effect {
        Effect::None => {}
        Effect::Quit => *should_quit = true,
        Effect::ScheduleReply { seq } => {
            // A new session supersedes whatever was still running
            for handle in active_abort_handles.drain(..) {
                handle.abort();
            }
            let delay =
                runtime::random_reply_delay(config.reply_delay_min_ms, config.reply_delay_max_ms);
            active_abort_handles.push(runtime::spawn_reply_timer(seq, delay, tx.clone()));
        }
        Effect::BeginReveal { seq, text } => {
            for handle in active_abort_handles.drain(..) {
                handle.abort();
            }
            active_abort_handles.push(runtime::spawn_reveal(
                seq,
                text,
                Duration::from_millis(config.word_delay_ms),
                Duration::from_millis(config.punctuation_pause_ms),
                tx.clone(),
            ));
        }
    }
}
