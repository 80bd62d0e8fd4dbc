//! Application state for the codechat TUI.

use std::sync::Arc;

use codechat_engine::{
    last_code_block, spawn_turn, CannedResponder, Config, Conversation, PendingResponse, Revision,
    Session,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::event::Action;
use crate::theme::Theme;
use crate::widgets::TextInputState;

/// Ticks a notification stays visible.
const NOTIFICATION_TTL: usize = 12;

/// Lines scrolled per PageUp/PageDown.
const PAGE_LINES: usize = 10;

/// Main application state.
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether to show the help overlay.
    pub show_help: bool,

    /// The conversation and its responder.
    pub session: Session,

    /// Input bar state.
    pub input_state: TextInputState,

    /// Active color palette.
    pub theme: Theme,

    /// Transcript scroll, in lines up from the newest content.
    pub scroll_from_bottom: usize,

    /// Animation frame counter.
    pub tick: usize,

    /// Largest scroll offset the last drawn frame could show.
    scroll_limit: usize,

    /// Temporary message shown in the footer.
    pub notification: Option<String>,

    notification_ttl: usize,

    pending: Option<PendingResponse>,

    revision_rx: watch::Receiver<Revision>,
}

impl App {
    /// Create a new app around `session`.
    pub fn new(session: Session, theme: Theme) -> Self {
        let revision_rx = session.conversation().subscribe();
        Self {
            should_quit: false,
            show_help: false,
            session,
            input_state: TextInputState::new(),
            theme,
            scroll_from_bottom: 0,
            // Unbounded until the first frame is drawn
            scroll_limit: usize::MAX,
            tick: 0,
            notification: None,
            notification_ttl: 0,
            pending: None,
            revision_rx,
        }
    }

    /// Create an app with the canned responder configured by `config`.
    pub fn from_config(config: &Config, theme: Theme) -> Self {
        let session = Session::new(
            Conversation::from_config(config),
            Arc::new(CannedResponder::from_config(config)),
        );
        Self::new(session, theme)
    }

    /// The conversation being displayed.
    pub fn conversation(&self) -> &Conversation {
        self.session.conversation()
    }

    /// Whether a response is in flight.
    pub fn is_pending(&self) -> bool {
        self.session.conversation().is_pending()
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit(),
            Action::Help => self.show_help = !self.show_help,
            Action::Back => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.quit();
                }
            }
            Action::Up => self.scroll_up(1),
            Action::Down => self.scroll_down(1),
            Action::PageUp => self.scroll_up(PAGE_LINES),
            Action::PageDown => self.scroll_down(PAGE_LINES),
            Action::CopyCode => self.copy_last_code_block(),
            Action::None => {}
        }
    }

    /// Submit the input bar's content as the next user turn.
    ///
    /// Returns `false` if the conversation ignored it (blank input or a
    /// response already in flight); the input is then left untouched.
    pub fn send_input(&mut self) -> bool {
        let conversation = self.session.conversation_mut();
        conversation.set_draft(self.input_state.content());
        let Some(turn) = conversation.submit_draft() else {
            return false;
        };

        self.input_state.submit();
        self.scroll_from_bottom = 0;
        self.pending = Some(spawn_turn(self.session.responder(), turn));
        true
    }

    /// Complete the in-flight turn if its responder has settled.
    ///
    /// Returns `true` if a reply was appended.
    pub async fn poll_response(&mut self) -> bool {
        if !self.pending.as_ref().is_some_and(PendingResponse::is_finished) {
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let result = pending.resolve().await;
        self.session.conversation_mut().on_response(result).is_some()
    }

    /// Whether the conversation changed since the last call.
    pub fn take_revision_change(&mut self) -> bool {
        match self.revision_rx.has_changed() {
            Ok(true) => {
                self.revision_rx.borrow_and_update();
                true
            }
            _ => false,
        }
    }

    /// Advance animations and expire the notification.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    /// Copy the newest code block in the transcript to the clipboard.
    pub fn copy_last_code_block(&mut self) {
        let Some(code) =
            last_code_block(self.session.conversation().transcript()).map(|s| s.text.to_string())
        else {
            self.set_notification("No code block to copy".to_string());
            return;
        };

        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(code)) {
            Ok(()) => self.set_notification("Copied code block to clipboard".to_string()),
            Err(e) => {
                warn!(error = %e, "clipboard unavailable");
                self.set_notification(format!("Clipboard unavailable: {e}"));
            }
        }
    }

    /// Abort the in-flight responder task, if any.
    pub fn abort_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("aborting in-flight response");
            pending.abort();
        }
    }

    fn quit(&mut self) {
        self.abort_pending();
        self.should_quit = true;
    }

    /// Record the transcript's scroll limit from the last drawn frame.
    pub fn set_scroll_limit(&mut self, max_scroll: usize) {
        self.scroll_limit = max_scroll;
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_scroll);
    }

    fn scroll_up(&mut self, lines: usize) {
        self.scroll_from_bottom = self
            .scroll_from_bottom
            .saturating_add(lines)
            .min(self.scroll_limit);
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        self.notification_ttl = NOTIFICATION_TTL;
    }

    /// Wait for the in-flight response, however long it takes.
    #[cfg(test)]
    pub async fn settle(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let result = pending.resolve().await;
        self.session.conversation_mut().on_response(result).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, draw_app, TEST_HEIGHT, TEST_WIDTH};
    use codechat_engine::{Role, TurnState};

    #[tokio::test]
    async fn test_send_input_starts_turn() {
        let mut app = create_test_app();
        app.input_state.insert_str("How do I write a python loop?");

        assert!(app.send_input());
        assert!(app.is_pending());
        assert!(app.input_state.is_empty());
        assert_eq!(app.conversation().transcript().len(), 2);

        assert!(app.settle().await);
        let transcript = app.conversation().transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[2].role, Role::Assistant);
        assert!(transcript[2].content.contains("```python"));
        assert_eq!(app.conversation().state(), TurnState::Idle);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut app = create_test_app();
        app.input_state.insert_str("   ");

        assert!(!app.send_input());
        assert!(!app.is_pending());
        assert_eq!(app.input_state.content(), "   ");
        assert_eq!(app.conversation().transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_send_while_pending_keeps_input() {
        let mut app = create_test_app();
        app.input_state.insert_str("first");
        assert!(app.send_input());

        app.input_state.insert_str("second");
        assert!(!app.send_input());
        assert_eq!(app.input_state.content(), "second");
        assert_eq!(app.conversation().transcript().len(), 2);
        app.settle().await;
    }

    #[tokio::test]
    async fn test_poll_response_eventually_completes() {
        let mut app = create_test_app();
        app.input_state.insert_str("debug this error");
        app.send_input();

        let mut completed = false;
        for _ in 0..100 {
            if app.poll_response().await {
                completed = true;
                break;
            }
            tokio::task::yield_now().await;
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert!(completed);
        assert!(!app.is_pending());
        assert!(!app.poll_response().await);
    }

    #[tokio::test]
    async fn test_revision_change_observed_once() {
        let mut app = create_test_app();
        assert!(!app.take_revision_change());

        app.input_state.insert_str("react component please");
        app.send_input();
        assert!(app.take_revision_change());
        assert!(!app.take_revision_change());

        app.settle().await;
        assert!(app.take_revision_change());
    }

    #[tokio::test]
    async fn test_quit_aborts_pending() {
        let mut app = create_test_app();
        app.input_state.insert_str("hello");
        app.send_input();

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
        assert!(!app.settle().await);
    }

    #[test]
    fn test_back_closes_help_before_quitting() {
        let mut app = create_test_app();
        app.handle_action(Action::Help);
        assert!(app.show_help);

        app.handle_action(Action::Back);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        app.handle_action(Action::Back);
        assert!(app.should_quit);
    }

    #[test]
    fn test_scroll_saturates_at_bottom() {
        let mut app = create_test_app();
        app.handle_action(Action::PageUp);
        app.handle_action(Action::Up);
        assert_eq!(app.scroll_from_bottom, PAGE_LINES + 1);

        app.handle_action(Action::PageDown);
        app.handle_action(Action::PageDown);
        assert_eq!(app.scroll_from_bottom, 0);
    }

    #[test]
    fn test_scroll_clamped_to_transcript_top() {
        let mut app = create_test_app();
        for i in 0..15 {
            app.session.conversation_mut().submit(&format!("question {i}"));
            app.session.conversation_mut().on_response(Ok(format!("answer {i}")));
        }
        draw_app(&mut app, TEST_WIDTH, TEST_HEIGHT);

        for _ in 0..50 {
            app.handle_action(Action::PageUp);
        }
        let top = app.scroll_from_bottom;
        assert!(top > 0 && top < 50 * PAGE_LINES);
        assert!(draw_app(&mut app, TEST_WIDTH, TEST_HEIGHT).contains("Hi! I'm your coding assistant."));

        // One PageDown moves the view right away
        app.handle_action(Action::PageDown);
        assert_eq!(app.scroll_from_bottom, top.saturating_sub(PAGE_LINES));
        assert!(!draw_app(&mut app, TEST_WIDTH, TEST_HEIGHT).contains("Hi! I'm your coding assistant."));
    }

    #[test]
    fn test_scroll_limit_shrinks_offset() {
        let mut app = create_test_app();
        app.scroll_from_bottom = 40;
        app.set_scroll_limit(7);
        assert_eq!(app.scroll_from_bottom, 7);
        app.handle_action(Action::Up);
        assert_eq!(app.scroll_from_bottom, 7);
    }

    #[test]
    fn test_copy_without_code_block_notifies() {
        let mut app = create_test_app();
        app.handle_action(Action::CopyCode);
        assert_eq!(app.notification.as_deref(), Some("No code block to copy"));
    }

    #[test]
    fn test_notification_expires() {
        let mut app = create_test_app();
        app.copy_last_code_block();
        for _ in 0..NOTIFICATION_TTL - 1 {
            app.tick();
        }
        assert!(app.notification.is_some());
        app.tick();
        assert!(app.notification.is_none());
    }
}
