use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::{App, Phase};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{Landing, MessageList, TitleBar};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar {
        status: &app.status_message,
        renderer_name: tui.renderer.name(),
        message_count: app.message_count(),
        max_messages: app.limits.max_messages,
    };
    title_bar.render(frame, title_area);

    if app.is_first_message && app.messages.is_empty() {
        Landing::new(&tui.suggestions, tui.carousel_index).render(frame, main_area);
    } else {
        let renderer = tui.renderer.clone();
        let mut list = MessageList {
            state: &mut tui.message_list,
            bubbles: &app.messages,
            renderer: &*renderer,
            awaiting_reply: matches!(app.phase, Phase::AwaitingReply { .. }),
            revealing: matches!(app.phase, Phase::Revealing { .. }),
            dropped_epoch: app.dropped_count,
            spinner_frame: tui.spinner_frame,
        };
        list.render(frame, main_area);
    }

    tui.input_box.render(frame, input_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use crate::tui::renderer;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut tui = TuiState::new(
            renderer::select(false),
            vec!["hello".to_string()],
            app.limits.max_input_chars,
        );
        terminal.draw(|f| draw_ui(f, app, &mut tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn fresh_app_shows_landing() {
        let app = test_app();
        let text = draw(&app);
        assert!(text.contains("Banter"));
        assert!(text.contains("hello"));
    }

    #[test]
    fn conversation_replaces_landing() {
        use crate::core::action::{Action, update};
        let mut app = test_app();
        update(&mut app, Action::Submit("hello".into()));
        let text = draw(&app);
        assert!(text.contains("you"));
        // Typing indicator visible while awaiting the reply.
        assert!(text.contains("assistant"));
    }
}
