//! Conversation controller.
//!
//! A [`Conversation`] owns the transcript and a two-state turn machine:
//!
//! ```text
//!            submit(text)               on_response(result)
//!   Idle ─────────────────────▶ AwaitingResponse ─────────────────────▶ Idle
//!    ▲  (non-blank text only)    │ submit: ignored      appends reply
//!    └───────────────────────────┘                      or fallback
//! ```
//!
//! At most one turn is in flight. The controller never calls the responder
//! itself: [`Conversation::submit`] hands back a [`Turn`] which the caller
//! resolves, either inline through [`Session::send`] or on a background task
//! through [`spawn_turn`].

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::chat::{Message, MessageId, GREETING_ID};
use crate::config::Config;
use crate::responder::{ResponseFailure, Responder};

/// Counter bumped on every transcript or turn-state change.
pub type Revision = u64;

/// State of the turn machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// Ready to accept a new utterance.
    #[default]
    Idle,
    /// A response is in flight; new submissions are ignored.
    AwaitingResponse,
}

/// A submitted utterance awaiting its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Id of the user message that opened the turn.
    pub message_id: MessageId,
    /// Text to hand to the responder.
    pub utterance: String,
}

/// Transcript plus turn state for a single chat session.
#[derive(Debug)]
pub struct Conversation {
    session_id: String,
    transcript: Vec<Message>,
    state: TurnState,
    draft: String,
    next_id: MessageId,
    fallback_message: String,
    revision: watch::Sender<Revision>,
}

impl Conversation {
    /// Start a conversation opened by `greeting`.
    pub fn new(greeting: impl Into<String>, fallback_message: impl Into<String>) -> Self {
        let (revision, _) = watch::channel(0);
        let session_id = Uuid::new_v4().to_string();
        debug!(%session_id, "conversation started");
        Self {
            session_id,
            transcript: vec![Message::assistant(GREETING_ID, greeting)],
            state: TurnState::Idle,
            draft: String::new(),
            next_id: GREETING_ID + 1,
            fallback_message: fallback_message.into(),
            revision,
        }
    }

    /// Start a conversation using greeting and fallback text from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.greeting.clone(), config.fallback_message.clone())
    }

    /// Session identifier (used for log correlation).
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Messages in creation order.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Current turn state.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Whether a response is in flight.
    pub fn is_pending(&self) -> bool {
        self.state == TurnState::AwaitingResponse
    }

    /// The not-yet-submitted input text.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft text.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Text appended in place of a failed response.
    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    /// Current revision.
    pub fn revision(&self) -> Revision {
        *self.revision.borrow()
    }

    /// Subscribe to revision changes.
    pub fn subscribe(&self) -> watch::Receiver<Revision> {
        self.revision.subscribe()
    }

    /// Submit a user utterance.
    ///
    /// Returns `None` without touching any state if a response is already in
    /// flight or `text` is blank.
    pub fn submit(&mut self, text: &str) -> Option<Turn> {
        if self.is_pending() {
            debug!(session_id = %self.session_id, "submit ignored: response in flight");
            return None;
        }
        if text.trim().is_empty() {
            return None;
        }

        let message_id = self.push(Message::user(self.next_id, text));
        self.draft.clear();
        self.state = TurnState::AwaitingResponse;
        self.notify();

        info!(session_id = %self.session_id, message_id, "turn started");
        Some(Turn {
            message_id,
            utterance: text.to_string(),
        })
    }

    /// Submit the current draft.
    pub fn submit_draft(&mut self) -> Option<Turn> {
        let draft = std::mem::take(&mut self.draft);
        let turn = self.submit(&draft);
        if turn.is_none() {
            self.draft = draft;
        }
        turn
    }

    /// Complete the in-flight turn with the responder's result.
    ///
    /// A failure is replaced by the fallback message. Returns the appended
    /// assistant message, or `None` if no turn was in flight.
    pub fn on_response(&mut self, result: Result<String, ResponseFailure>) -> Option<&Message> {
        if !self.is_pending() {
            warn!(session_id = %self.session_id, "response received while idle; ignored");
            return None;
        }

        let content = match result {
            Ok(content) => content,
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "responder failed");
                self.fallback_message.clone()
            }
        };

        let message_id = self.push(Message::assistant(self.next_id, content));
        self.state = TurnState::Idle;
        self.notify();

        info!(session_id = %self.session_id, message_id, "turn completed");
        self.transcript.last()
    }

    fn push(&mut self, message: Message) -> MessageId {
        let id = message.id;
        self.next_id = id + 1;
        self.transcript.push(message);
        id
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A responder call running on a background task.
#[derive(Debug)]
pub struct PendingResponse {
    handle: JoinHandle<Result<String, ResponseFailure>>,
}

impl PendingResponse {
    /// Whether the responder has settled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result. A panicked or aborted task becomes a failure.
    pub async fn resolve(self) -> Result<String, ResponseFailure> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "responder task did not complete");
                Err(ResponseFailure::Aborted)
            }
        }
    }

    /// Abort the background task.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Run the responder for `turn` on the tokio runtime.
pub fn spawn_turn(responder: Arc<dyn Responder>, turn: Turn) -> PendingResponse {
    let handle = tokio::spawn(async move { responder.respond(&turn.utterance).await });
    PendingResponse { handle }
}

/// A conversation bound to its responder.
pub struct Session {
    conversation: Conversation,
    responder: Arc<dyn Responder>,
}

impl Session {
    /// Bind `conversation` to `responder`.
    pub fn new(conversation: Conversation, responder: Arc<dyn Responder>) -> Self {
        Self {
            conversation,
            responder,
        }
    }

    /// The underlying conversation.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Mutable access to the underlying conversation.
    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    /// Shared handle to the responder.
    pub fn responder(&self) -> Arc<dyn Responder> {
        Arc::clone(&self.responder)
    }

    /// Run one full turn: submit, await the responder, append the reply.
    ///
    /// Returns `false` if the submission was ignored. Never fails: responder
    /// errors and panics become the fallback message.
    pub async fn send(&mut self, text: &str) -> bool {
        let Some(turn) = self.conversation.submit(text) else {
            return false;
        };
        let result = spawn_turn(self.responder(), turn).resolve().await;
        self.conversation.on_response(result);
        true
    }

    /// Start a turn whose response resolves on a background task.
    pub fn start_turn(&mut self, text: &str) -> Option<PendingResponse> {
        let turn = self.conversation.submit(text)?;
        Some(spawn_turn(self.responder(), turn))
    }

    /// Consume the session, returning the conversation.
    pub fn into_conversation(self) -> Conversation {
        self.conversation
    }
}
