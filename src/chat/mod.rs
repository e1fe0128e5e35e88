//! Transcript model for chatting with the project assistant.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::watch;

use crate::auth::Session;
use crate::client::{ApiRequest, RequestOutcome};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }
}

/// Chat with the assistant of one project.
///
/// Shared failures (network, expired session) land in the session's error
/// slot and add nothing to the transcript; domain errors handed back by the
/// server are shown inline as system messages.
#[derive(Debug)]
pub struct ChatBox {
    session: Session,
    project_id: String,
    messages: Vec<ChatMessage>,
    last_error: Option<String>,
    pending: watch::Sender<bool>,
}

impl ChatBox {
    pub fn new(session: Session, project_id: impl Into<String>) -> Self {
        Self {
            session,
            project_id: project_id.into(),
            messages: Vec::new(),
            last_error: None,
            pending: watch::Sender::new(false),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a send is waiting for the assistant's answer.
    pub fn is_pending(&self) -> bool {
        *self.pending.borrow()
    }

    /// Observe the pending flag, e.g. to show a thinking indicator.
    pub fn subscribe_pending(&self) -> watch::Receiver<bool> {
        self.pending.subscribe()
    }

    /// Error shown by the most recent send, if it failed inline.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Send a message; blank input is ignored.
    ///
    /// Returns the entry appended in response (AI reply or inline error).
    pub async fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.last_error = None;
        self.messages.push(ChatMessage::new(Sender::User, text));

        let request = ApiRequest::post(
            format!("/project/{}/chat", self.project_id),
            json!({ "user_message": text }),
        );
        self.pending.send_replace(true);
        let outcome = self.session.request(request).await;
        self.pending.send_replace(false);

        let reply = match outcome {
            RequestOutcome::Success { data, .. } => match data.get("reply").and_then(Value::as_str) {
                Some(reply) => ChatMessage::new(Sender::Ai, reply),
                None => self.inline_error("No reply received"),
            },
            RequestOutcome::PassthroughError { body } => {
                let message = error_message(&body);
                self.inline_error(&message)
            }
            RequestOutcome::Failure { error_code } => {
                tracing::debug!(code = %error_code, project = %self.project_id, "Chat send failed");
                return None;
            }
        };
        self.messages.push(reply);
        self.messages.last()
    }

    fn inline_error(&mut self, message: &str) -> ChatMessage {
        let text = format!("Error: {message}");
        self.last_error = Some(text.clone());
        ChatMessage::new(Sender::System, text)
    }
}

/// Human-readable message from a pass-through error body.
fn error_message(body: &Value) -> String {
    let error = body.get("error");
    error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| error.and_then(Value::as_str))
        .or_else(|| error.and_then(|e| e.get("code")).and_then(Value::as_str))
        .unwrap_or("Unknown error")
        .to_string()
}
