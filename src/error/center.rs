//! Single-slot holder for the error currently shown to the user.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::watch;

use super::codes::ErrorCode;
use super::descriptor::{ErrorDescriptor, Navigator, ResolvedAction};
use super::response::{resolve_code, ErrorResponse};
use super::{ClientError, Result};
use crate::client::{RequestOutcome, RetryCapability};

/// Input accepted by [`ErrorCenter::report`]: a code, or a response to resolve.
#[derive(Debug, Clone)]
pub enum ErrorSignal {
    Code(ErrorCode),
    Response(ErrorResponse),
}

impl From<ErrorCode> for ErrorSignal {
    fn from(code: ErrorCode) -> Self {
        Self::Code(code)
    }
}

impl From<ErrorResponse> for ErrorSignal {
    fn from(response: ErrorResponse) -> Self {
        Self::Response(response)
    }
}

impl ErrorSignal {
    fn into_code(self) -> ErrorCode {
        match self {
            Self::Code(code) => code,
            Self::Response(response) => resolve_code(&response),
        }
    }
}

/// The active user-facing error.
#[derive(Clone)]
pub struct CurrentError {
    pub code: ErrorCode,
    pub retry: Option<RetryCapability>,
    pub context: Map<String, Value>,
}

impl fmt::Debug for CurrentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentError")
            .field("code", &self.code)
            .field("retry", &self.retry.as_ref().map(|_| ".."))
            .field("context", &self.context)
            .finish()
    }
}

impl CurrentError {
    /// Descriptor to render, falling back to `INTERNAL_ERROR` for codes without one.
    pub fn descriptor(&self) -> &'static ErrorDescriptor {
        self.code.display_descriptor()
    }

    pub fn message(&self) -> &'static str {
        self.descriptor().message
    }
}

/// Process-wide error slot.
///
/// Cloning yields another handle to the same slot. Each report overwrites
/// the previous error; there is no queue.
#[derive(Clone)]
pub struct ErrorCenter {
    slot: Arc<watch::Sender<Option<CurrentError>>>,
}

impl fmt::Debug for ErrorCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorCenter")
            .field("current", &*self.slot.borrow())
            .finish()
    }
}

impl Default for ErrorCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorCenter {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
        }
    }

    /// Replace the current error.
    pub fn report(
        &self,
        signal: impl Into<ErrorSignal>,
        retry: Option<RetryCapability>,
        context: Map<String, Value>,
    ) {
        let code = signal.into().into_code();
        tracing::debug!(code = %code, retryable = retry.is_some(), "Reporting error");
        self.slot.send_replace(Some(CurrentError {
            code,
            retry,
            context,
        }));
    }

    /// Report a bare code with no retry capability or context.
    pub fn report_code(&self, code: ErrorCode) {
        self.report(code, None, Map::new());
    }

    /// Empty the slot.
    pub fn clear(&self) {
        self.slot.send_replace(None);
    }

    pub fn current(&self) -> Option<CurrentError> {
        self.slot.borrow().clone()
    }

    pub fn current_code(&self) -> Option<ErrorCode> {
        self.slot.borrow().as_ref().map(|error| error.code)
    }

    pub fn descriptor(&self) -> Option<&'static ErrorDescriptor> {
        self.current_code().map(ErrorCode::display_descriptor)
    }

    /// Observe every change to the slot.
    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentError>> {
        self.slot.subscribe()
    }

    /// Run the recovery action at `index` for the current error.
    ///
    /// The slot is cleared before the action runs, so a retry that fails
    /// again reports into an empty slot. Returns the retried outcome when
    /// the action re-issued the call.
    pub async fn perform(
        &self,
        index: usize,
        navigator: &dyn Navigator,
    ) -> Result<Option<RequestOutcome>> {
        let error = self
            .current()
            .ok_or_else(|| ClientError::InvalidState("no active error".to_string()))?;
        let action = error.descriptor().actions.get(index).ok_or_else(|| {
            ClientError::InvalidArgument(format!(
                "{} has no action at index {index}",
                error.code
            ))
        })?;

        self.clear();
        match action.kind.resolve(&error.context) {
            ResolvedAction::Navigate(path) => navigator.navigate(&path).await,
            ResolvedAction::Back => navigator.back().await,
            ResolvedAction::Reload => navigator.reload().await,
            ResolvedAction::Retry => {
                if let Some(retry) = error.retry {
                    return Ok(Some(retry.invoke().await));
                }
            }
            ResolvedAction::Dismiss => {}
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl Navigator for RecordingNavigator {
        async fn navigate(&self, path: &str) {
            self.visits.lock().unwrap().push(path.to_string());
        }
        async fn back(&self) {
            self.visits.lock().unwrap().push("<back>".to_string());
        }
        async fn reload(&self) {
            self.visits.lock().unwrap().push("<reload>".to_string());
        }
    }

    #[test]
    fn report_response_resolves_before_storing() {
        let center = ErrorCenter::new();
        center.report(
            ErrorResponse::new(None, Some(503)),
            None,
            Map::new(),
        );
        assert_eq!(center.current_code(), Some(ErrorCode::DatabaseError));
    }

    #[test]
    fn last_report_wins() {
        let center = ErrorCenter::new();
        center.report_code(ErrorCode::S3Error);
        center.report_code(ErrorCode::NoToken);
        assert_eq!(center.current_code(), Some(ErrorCode::NoToken));
        center.clear();
        assert!(center.current().is_none());
    }

    #[test]
    fn clones_share_the_slot() {
        let center = ErrorCenter::new();
        let other = center.clone();
        other.report_code(ErrorCode::InvalidFieldFormat);
        assert_eq!(center.current_code(), Some(ErrorCode::InvalidFieldFormat));
    }

    #[tokio::test]
    async fn subscribers_see_reports() {
        let center = ErrorCenter::new();
        let mut rx = center.subscribe();
        center.report_code(ErrorCode::InternalError);
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow().as_ref().map(|e| e.code),
            Some(ErrorCode::InternalError)
        );
    }

    #[tokio::test]
    async fn perform_navigates_with_context_and_clears() {
        let center = ErrorCenter::new();
        let context = json!({ "org_id": "12" }).as_object().cloned().unwrap();
        center.report(ErrorCode::StoryNotFound, None, context);

        let navigator = RecordingNavigator::default();
        let outcome = center.perform(0, &navigator).await.unwrap();

        assert!(outcome.is_none());
        assert_eq!(*navigator.visits.lock().unwrap(), vec!["/org/12".to_string()]);
        assert!(center.current().is_none());
    }

    #[tokio::test]
    async fn perform_retry_invokes_capability() {
        let center = ErrorCenter::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let retry = RetryCapability::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { RequestOutcome::success(json!({ "ok": true }), None) }.boxed()
        });
        center.report(ErrorCode::NetworkError, Some(retry), Map::new());

        let navigator = RecordingNavigator::default();
        let outcome = center.perform(0, &navigator).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(outcome, Some(RequestOutcome::Success { .. })));
    }

    #[tokio::test]
    async fn perform_rejects_bad_index_and_empty_slot() {
        let center = ErrorCenter::new();
        let navigator = RecordingNavigator::default();
        assert!(matches!(
            center.perform(0, &navigator).await,
            Err(ClientError::InvalidState(_))
        ));

        center.report_code(ErrorCode::NoToken);
        assert!(matches!(
            center.perform(5, &navigator).await,
            Err(ClientError::InvalidArgument(_))
        ));
        assert_eq!(center.current_code(), Some(ErrorCode::NoToken));
    }
}
