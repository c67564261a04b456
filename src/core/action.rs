//! # Actions
//!
//! Everything that can happen in Banter becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! A reveal step lands? That's `Action::RevealStep`.
//!
//! The `update()` function takes the current state and an action and
//! mutates the state. No side effects here — timers and drawing happen in
//! the TUI layer, instructed by the returned `Effect`.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: drive a whole exchange by feeding the
//! reducer the same action sequence the runtime would produce.

use log::{debug, info};

use crate::core::reply::ReplyKind;
use crate::core::state::{App, Bubble, Phase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Raw text from the input box. Validated here, not by the caller.
    Submit(String),
    /// The randomized pre-reply delay elapsed for session `seq`.
    ReplyTimerElapsed { seq: u64 },
    /// One reveal step for session `seq`: the accumulated text so far.
    RevealStep { seq: u64, text: String },
    /// Session `seq` consumed its last token. `text` is the original full
    /// reply, used for the final display verbatim.
    RevealDone { seq: u64, text: String },
    Quit,
}

/// What the runtime must do after a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Start the randomized pre-reply timer for session `seq`.
    ScheduleReply { seq: u64 },
    /// Spawn the reveal driver for session `seq` over `text`.
    BeginReveal { seq: u64, text: String },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(raw) => submit(app, &raw),
        Action::ReplyTimerElapsed { seq } => reply_timer_elapsed(app, seq),
        Action::RevealStep { seq, text } => reveal_step(app, seq, text),
        Action::RevealDone { seq, text } => reveal_done(app, seq, text),
        Action::Quit => Effect::Quit,
    }
}

/// `Idle → AwaitingReply`. Rejections leave the state untouched.
fn submit(app: &mut App, raw: &str) -> Effect {
    let text = raw.trim();
    if text.is_empty() {
        return Effect::None;
    }
    if app.is_processing() {
        debug!("Submission ignored while processing");
        return Effect::None;
    }
    if text.chars().count() > app.limits.max_input_chars {
        info!("Submission rejected: over {} characters", app.limits.max_input_chars);
        app.status_message = format!(
            "Message is too long. Please limit to {} characters.",
            app.limits.max_input_chars
        );
        return Effect::None;
    }

    app.is_first_message = false;

    let bubble = Bubble::user(text);
    info!("{}", bubble.label());
    app.messages.push_back(bubble);

    // Resolve now; the record sits until the typing-indicator delay elapses.
    app.pending_reply = Some(app.replies.resolve(text));
    app.reveal_seq += 1;
    app.phase = Phase::AwaitingReply { seq: app.reveal_seq };
    app.status_message = String::from("Assistant is typing…");

    Effect::ScheduleReply { seq: app.reveal_seq }
}

/// `AwaitingReply → Revealing` for bot replies, `AwaitingReply → Idle` for
/// error replies (displayed immediately, never animated).
fn reply_timer_elapsed(app: &mut App, seq: u64) -> Effect {
    if app.phase != (Phase::AwaitingReply { seq }) {
        debug!("Stale reply timer for session {seq} ignored");
        return Effect::None;
    }

    let Some(reply) = app.pending_reply.take() else {
        // Timer without a resolved reply: nothing sensible to show.
        debug!("Reply timer fired with no pending reply");
        app.phase = Phase::Idle;
        return Effect::None;
    };

    match reply.kind {
        ReplyKind::Bot => {
            app.messages.push_back(Bubble::bot(""));
            app.phase = Phase::Revealing { seq };
            Effect::BeginReveal { seq, text: reply.text }
        }
        ReplyKind::Error => {
            let bubble = Bubble::error(reply.text);
            info!("{}", bubble.label());
            app.status_message = bubble.label();
            app.messages.push_back(bubble);
            app.phase = Phase::Idle;
            prune(app);
            Effect::None
        }
    }
}

fn reveal_step(app: &mut App, seq: u64, text: String) -> Effect {
    if app.phase != (Phase::Revealing { seq }) {
        debug!("Stale reveal step for session {seq} ignored");
        return Effect::None;
    }
    if let Some(bubble) = app.messages.back_mut() {
        bubble.content = text;
    }
    Effect::None
}

/// `Revealing → Idle`. The bubble is finalized with the original full text
/// so the displayed reply is byte-identical to the canned source.
fn reveal_done(app: &mut App, seq: u64, text: String) -> Effect {
    if app.phase != (Phase::Revealing { seq }) {
        debug!("Stale reveal completion for session {seq} ignored");
        return Effect::None;
    }
    if let Some(bubble) = app.messages.back_mut() {
        bubble.content = text;
        info!("{}", bubble.label());
        app.status_message = bubble.label();
    }
    app.phase = Phase::Idle;
    prune(app);
    Effect::None
}

/// FIFO eviction down to the configured ceiling. Runs only after a reply is
/// fully displayed, so it never interrupts an in-progress exchange.
fn prune(app: &mut App) {
    while app.messages.len() > app.limits.max_messages {
        if let Some(dropped) = app.messages.pop_front() {
            app.dropped_count += 1;
            debug!("Pruned oldest message: {}", dropped.label());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Source;
    use crate::test_support::{test_app, test_app_with_limits};

    /// Drive one full bot exchange and return the completed app.
    fn run_exchange(app: &mut App, input: &str) {
        let effect = update(app, Action::Submit(input.to_string()));
        let Effect::ScheduleReply { seq } = effect else {
            panic!("expected ScheduleReply, got {effect:?}");
        };
        let effect = update(app, Action::ReplyTimerElapsed { seq });
        match effect {
            Effect::BeginReveal { seq, text } => {
                let done = update(app, Action::RevealDone { seq, text });
                assert_eq!(done, Effect::None);
            }
            Effect::None => {} // error reply, already displayed
            other => panic!("unexpected effect {other:?}"),
        }
        assert_eq!(app.phase, Phase::Idle);
    }

    #[test]
    fn submit_enters_awaiting_reply() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("hello".into()));
        assert_eq!(effect, Effect::ScheduleReply { seq: 1 });
        assert_eq!(app.phase, Phase::AwaitingReply { seq: 1 });
        assert_eq!(app.message_count(), 1);
        assert_eq!(app.messages[0].source, Source::User);
        assert_eq!(app.messages[0].content, "hello");
        assert!(app.pending_reply.is_some());
        assert!(!app.is_first_message);
    }

    #[test]
    fn submit_trims_input() {
        let mut app = test_app();
        update(&mut app, Action::Submit("  hello  ".into()));
        assert_eq!(app.messages[0].content, "hello");
    }

    #[test]
    fn empty_and_whitespace_submissions_are_rejected() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit(String::new())), Effect::None);
        assert_eq!(update(&mut app, Action::Submit("   \n\t ".into())), Effect::None);
        assert_eq!(app.message_count(), 0);
        assert_eq!(app.phase, Phase::Idle);
        assert!(app.is_first_message);
    }

    #[test]
    fn over_length_submission_is_rejected_with_notice() {
        let mut app = test_app();
        let long = "x".repeat(app.limits.max_input_chars + 1);
        let effect = update(&mut app, Action::Submit(long));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.message_count(), 0);
        assert_eq!(app.phase, Phase::Idle);
        assert!(app.status_message.contains("too long"));
    }

    #[test]
    fn length_ceiling_counts_characters_not_bytes() {
        let mut app = test_app_with_limits(200, 4);
        // Four multi-byte characters are exactly at the ceiling.
        let effect = update(&mut app, Action::Submit("éééé".into()));
        assert!(matches!(effect, Effect::ScheduleReply { .. }));
    }

    #[test]
    fn submission_while_processing_is_a_noop() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hello".into()));
        let count = app.message_count();
        let phase = app.phase;

        let effect = update(&mut app, Action::Submit("again".into()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.message_count(), count);
        assert_eq!(app.phase, phase);
    }

    #[test]
    fn bot_reply_transitions_through_revealing() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hello".into()));
        let effect = update(&mut app, Action::ReplyTimerElapsed { seq: 1 });
        let Effect::BeginReveal { seq, text } = effect else {
            panic!("expected BeginReveal");
        };
        assert_eq!(seq, 1);
        assert!(!text.is_empty());
        assert_eq!(app.phase, Phase::Revealing { seq: 1 });
        // Empty slot appended for the animation to fill.
        assert_eq!(app.message_count(), 2);
        assert_eq!(app.messages[1].source, Source::Bot);
        assert_eq!(app.messages[1].content, "");
    }

    #[test]
    fn reveal_steps_fill_the_slot_and_done_finalizes() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hello".into()));
        let Effect::BeginReveal { seq, text } =
            update(&mut app, Action::ReplyTimerElapsed { seq: 1 })
        else {
            panic!("expected BeginReveal");
        };

        update(&mut app, Action::RevealStep { seq, text: "Hi!".into() });
        assert_eq!(app.messages[1].content, "Hi!");
        assert_eq!(app.phase, Phase::Revealing { seq });

        update(&mut app, Action::RevealDone { seq, text: text.clone() });
        assert_eq!(app.messages[1].content, text);
        assert_eq!(app.phase, Phase::Idle);
    }

    #[test]
    fn error_reply_skips_revealing() {
        let mut app = test_app();
        update(&mut app, Action::Submit("error test".into()));
        let effect = update(&mut app, Action::ReplyTimerElapsed { seq: 1 });
        assert_eq!(effect, Effect::None);
        assert_eq!(app.phase, Phase::Idle);
        assert_eq!(app.messages[1].source, Source::Error);
        assert!(!app.messages[1].content.is_empty());
        assert!(app.status_message.starts_with("Error:"));
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hello".into()));
        assert_eq!(
            update(&mut app, Action::ReplyTimerElapsed { seq: 99 }),
            Effect::None
        );
        assert_eq!(app.phase, Phase::AwaitingReply { seq: 1 });
        assert_eq!(app.message_count(), 1);
    }

    #[test]
    fn stale_reveal_actions_have_no_visible_effect() {
        let mut app = test_app();
        run_exchange(&mut app, "hello");
        let snapshot: Vec<String> = app.messages.iter().map(|b| b.content.clone()).collect();

        // Callbacks from the completed session arrive late.
        update(&mut app, Action::RevealStep { seq: 1, text: "stale".into() });
        update(&mut app, Action::RevealDone { seq: 1, text: "stale".into() });

        let after: Vec<String> = app.messages.iter().map(|b| b.content.clone()).collect();
        assert_eq!(snapshot, after);
        assert_eq!(app.phase, Phase::Idle);
    }

    #[test]
    fn default_reply_carries_original_input() {
        let mut app = test_app();
        update(&mut app, Action::Submit("xyz123".into()));
        let Effect::BeginReveal { text, .. } =
            update(&mut app, Action::ReplyTimerElapsed { seq: 1 })
        else {
            panic!("expected BeginReveal");
        };
        assert!(text.contains("xyz123"));
    }

    #[test]
    fn pruning_is_fifo_and_bounded() {
        let mut app = test_app_with_limits(6, 2000);
        for i in 0..5 {
            run_exchange(&mut app, &format!("message {i}"));
        }
        // 5 exchanges = 10 bubbles, ceiling 6.
        assert_eq!(app.message_count(), 6);
        // Oldest survivor is the immediate successor of the last dropped one:
        // bubbles 0..=3 dropped, bubble 4 ("message 2" from the user) remains.
        assert_eq!(app.messages[0].content, "message 2");
        assert_eq!(app.messages[0].source, Source::User);
    }

    #[test]
    fn pruning_never_interrupts_a_pending_exchange() {
        let mut app = test_app_with_limits(2, 2000);
        run_exchange(&mut app, "hello");
        assert_eq!(app.message_count(), 2);

        // Mid-exchange the user bubble may exceed the ceiling; eviction
        // waits until the reply is fully displayed.
        update(&mut app, Action::Submit("again".into()));
        assert_eq!(app.message_count(), 3);
        let Effect::BeginReveal { seq, text } =
            update(&mut app, Action::ReplyTimerElapsed { seq: 2 })
        else {
            panic!("expected BeginReveal");
        };
        update(&mut app, Action::RevealDone { seq, text });
        assert_eq!(app.message_count(), 2);
    }

    #[test]
    fn quit_action_requests_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
