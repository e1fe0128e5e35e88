//! CLI handlers for authenticated requests and chat.

use reqwest::Method;

use crate::auth::Session;
use crate::chat::{ChatBox, Sender};
use crate::client::{ApiRequest, RequestOutcome};
use crate::error::ErrorCenter;

/// Handle `commonthread request <METHOD> <PATH> [--body JSON]`.
pub async fn handle_request(
    session: &Session,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let method: Method = method.to_ascii_uppercase().parse()?;
    let mut request = ApiRequest::new(method, path);
    if let Some(body) = body {
        request = request.json(serde_json::from_str(body)?);
    }

    match session.request(request).await {
        RequestOutcome::Success { data, .. } => {
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
        RequestOutcome::PassthroughError { body } => {
            eprintln!("{}", serde_json::to_string_pretty(&body)?);
            Err("request was rejected".into())
        }
        RequestOutcome::Failure { error_code } => {
            render_current_error(session.errors());
            Err(format!("request failed ({error_code})").into())
        }
    }
}

/// Handle `commonthread chat <PROJECT_ID> <MESSAGE>`.
pub async fn handle_chat(
    session: &Session,
    project_id: &str,
    message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut chat = ChatBox::new(session.clone(), project_id);
    match chat.send(message).await {
        Some(reply) if reply.sender == Sender::Ai => {
            println!("{}", reply.text);
            Ok(())
        }
        Some(reply) => Err(reply.text.clone().into()),
        None => {
            render_current_error(session.errors());
            Err("chat message was not delivered".into())
        }
    }
}

/// Print the current error and its recovery actions to stderr.
pub fn render_current_error(errors: &ErrorCenter) {
    let Some(error) = errors.current() else {
        return;
    };
    let descriptor = error.descriptor();
    eprintln!("❌ {} ({})", descriptor.message, error.code);
    for (index, action) in descriptor.actions.iter().enumerate() {
        eprintln!("   [{index}] {}", action.label);
    }
}
