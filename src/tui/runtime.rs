//! Timer-driven background tasks.
//!
//! Everything asynchronous in Banter is one of two tokio tasks: the
//! randomized pre-reply delay and the token-by-token reveal driver. Both
//! communicate with the event loop exclusively by sending [`Action`]s over a
//! channel, and both carry the session sequence number that lets a stale
//! task's actions be ignored after it has been superseded. The returned
//! [`AbortHandle`]s additionally let the loop stop superseded tasks outright.

use std::sync::mpsc::Sender;
use std::time::Duration;

use log::{debug, warn};
use rand::Rng;
use tokio::task::AbortHandle;

use crate::core::action::Action;
use crate::core::reveal::{Pause, RevealSession};

/// Pick the typing-indicator delay uniformly from the configured range.
pub fn random_reply_delay(min_ms: u64, max_ms: u64) -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
}

/// Sleep out the typing-indicator delay, then wake the controller.
pub fn spawn_reply_timer(seq: u64, delay: Duration, tx: Sender<Action>) -> AbortHandle {
    debug!("Reply timer for session {seq}: {}ms", delay.as_millis());
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if tx.send(Action::ReplyTimerElapsed { seq }).is_err() {
            warn!("Failed to send reply timer for session {seq}: receiver dropped");
        }
    })
    .abort_handle()
}

/// Drive a reveal session: one accumulated-text action per token, paced by
/// the pause the session names, then a completion action carrying the
/// original full text.
///
/// Each step is sent before its pause starts, so the event loop redraws the
/// accumulation while the task sleeps — steps never outrun the display.
pub fn spawn_reveal(
    seq: u64,
    text: String,
    word_delay: Duration,
    punctuation_pause: Duration,
    tx: Sender<Action>,
) -> AbortHandle {
    tokio::spawn(async move {
        let mut session = RevealSession::new(&text);
        while let Some(step) = session.advance() {
            let pause = match step.pause {
                Pause::Word => word_delay,
                Pause::Punctuation => punctuation_pause,
            };
            let action = Action::RevealStep {
                seq,
                text: step.accumulated,
            };
            if tx.send(action).is_err() {
                warn!("Reveal session {seq} stopped: receiver dropped");
                return;
            }
            tokio::time::sleep(pause).await;
        }
        if tx.send(Action::RevealDone { seq, text }).is_err() {
            warn!("Failed to send reveal completion for session {seq}: receiver dropped");
        }
    })
    .abort_handle()
}
