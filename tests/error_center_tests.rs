//! Integration tests for the shared error slot and its recovery actions.

mod common;

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use commonthread_client::auth::Credentials;
use commonthread_client::client::{ApiRequest, RequestOutcome};
use commonthread_client::error::{
    descriptors, resolve_code, ClientError, ErrorCenter, ErrorCode, ErrorResponse, Navigator,
    PASSTHROUGH_CODES,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::client_with_timeout;

#[derive(Debug, Default)]
struct RecordingNavigator {
    steps: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn steps(&self) -> Vec<String> {
        self.steps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, path: &str) {
        self.steps.lock().unwrap().push(format!("navigate {path}"));
    }

    async fn back(&self) {
        self.steps.lock().unwrap().push("back".to_string());
    }

    async fn reload(&self) {
        self.steps.lock().unwrap().push("reload".to_string());
    }
}

fn context(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn latest_report_wins() {
    let center = ErrorCenter::new();
    center.report_code(ErrorCode::NetworkError);
    center.report(
        ErrorResponse::new(Some("DUPLICATE_USERNAME".to_string()), Some(409)),
        None,
        Map::new(),
    );

    assert_eq!(center.current_code(), Some(ErrorCode::DuplicateUsername));
    assert_eq!(
        center.descriptor().map(|d| d.message),
        Some("Username already exists")
    );

    center.clear();
    assert!(center.current().is_none());
    assert!(center.descriptor().is_none());
}

#[test]
fn response_resolution_prefers_known_code_then_status() {
    let cases = [
        (Some("ORG_NOT_FOUND"), Some(500), ErrorCode::OrgNotFound),
        (Some("MYSTERY"), Some(400), ErrorCode::InvalidJson),
        (None, Some(401), ErrorCode::InvalidToken),
        (None, Some(403), ErrorCode::InsufficientPermissions),
        (None, Some(404), ErrorCode::NotFound),
        (None, Some(409), ErrorCode::AlreadyExists),
        (None, Some(422), ErrorCode::InvalidStateTransition),
        (None, Some(500), ErrorCode::InternalError),
        (None, Some(503), ErrorCode::DatabaseError),
        (None, Some(418), ErrorCode::InternalError),
        (None, None, ErrorCode::InternalError),
    ];
    for (code, status, expected) in cases {
        let response = ErrorResponse::new(code.map(String::from), status);
        assert_eq!(resolve_code(&response), expected, "{code:?} / {status:?}");
    }
}

#[test]
fn fallback_only_codes_display_the_internal_error_descriptor() {
    let center = ErrorCenter::new();
    center.report(ErrorResponse::new(None, Some(409)), None, Map::new());

    let current = center.current().expect("reported");
    assert_eq!(current.code, ErrorCode::AlreadyExists);
    assert_eq!(current.descriptor().code, ErrorCode::InternalError);
    assert!(ErrorCode::AlreadyExists.descriptor().is_none());
}

#[test]
fn passthrough_codes_all_have_descriptors() {
    for code in PASSTHROUGH_CODES {
        assert!(code.descriptor().is_some(), "{code} lacks a descriptor");
    }
    assert_eq!(descriptors().len(), 22);
}

#[tokio::test]
async fn subscribers_see_each_change() {
    let center = ErrorCenter::new();
    let mut rx = center.subscribe();

    center.report_code(ErrorCode::StoryNotInOrg);
    rx.changed().await.expect("changed");
    assert_eq!(
        rx.borrow_and_update().as_ref().map(|e| e.code),
        Some(ErrorCode::StoryNotInOrg)
    );

    center.clear();
    rx.changed().await.expect("changed");
    assert!(rx.borrow_and_update().is_none());
}

#[tokio::test]
async fn story_not_found_navigates_to_org_from_context() {
    let center = ErrorCenter::new();
    let navigator = RecordingNavigator::default();

    center.report(
        ErrorCode::StoryNotFound,
        None,
        context(&[("org_id", json!(7))]),
    );
    let outcome = center.perform(0, &navigator).await.expect("perform");

    assert_eq!(outcome, None);
    assert_eq!(navigator.steps(), vec!["navigate /org/7".to_string()]);
    assert!(center.current().is_none());
}

#[tokio::test]
async fn navigation_actions_reach_the_navigator() {
    let center = ErrorCenter::new();
    let navigator = RecordingNavigator::default();

    center.report_code(ErrorCode::RefreshTokenExpired);
    center.perform(0, &navigator).await.expect("login again");

    center.report_code(ErrorCode::StoryNotInOrg);
    center.perform(0, &navigator).await.expect("go back");

    center.report_code(ErrorCode::AccessTokenExpired);
    center.perform(0, &navigator).await.expect("reload");

    assert_eq!(
        navigator.steps(),
        vec![
            "navigate /login".to_string(),
            "back".to_string(),
            "reload".to_string(),
        ]
    );
}

#[tokio::test]
async fn perform_rejects_empty_slot_and_bad_index() {
    let center = ErrorCenter::new();
    let navigator = RecordingNavigator::default();

    assert!(matches!(
        center.perform(0, &navigator).await,
        Err(ClientError::InvalidState(_))
    ));

    center.report_code(ErrorCode::NetworkError);
    assert!(matches!(
        center.perform(5, &navigator).await,
        Err(ClientError::InvalidArgument(_))
    ));
    assert_eq!(center.current_code(), Some(ErrorCode::NetworkError));
}

#[tokio::test]
async fn try_again_reissues_the_failed_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stories/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "stories": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "stories": [1] })))
        .mount(&server)
        .await;

    let client = client_with_timeout(&server.uri(), Duration::from_millis(300));
    let credentials = Credentials::new("tok-A", "ref-A");
    let first = client.request(ApiRequest::get("/stories/"), &credentials).await;
    assert_eq!(first, RequestOutcome::failure(ErrorCode::NetworkError));

    let navigator = RecordingNavigator::default();
    let retried = client
        .errors()
        .perform(0, &navigator)
        .await
        .expect("perform");

    assert_eq!(
        retried.and_then(RequestOutcome::into_data),
        Some(json!({ "stories": [1] }))
    );
    assert!(client.errors().current().is_none());
    assert!(navigator.steps().is_empty());
}
