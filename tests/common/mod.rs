#![allow(dead_code)]

use std::time::Duration;

use commonthread_client::client::AuthClient;
use commonthread_client::config::ClientConfig;
use commonthread_client::error::ErrorCenter;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn client_for(server: &MockServer) -> AuthClient {
    client_with_timeout(&server.uri(), Duration::from_secs(5))
}

pub fn client_with_timeout(base_url: &str, timeout: Duration) -> AuthClient {
    let config = ClientConfig::builder()
        .base_url(base_url)
        .timeout(timeout)
        .build();
    AuthClient::new(&config, ErrorCenter::new()).expect("client")
}

/// Mount a refresh endpoint exchanging `refresh_token` for `new_token`.
pub async fn mount_refresh(server: &MockServer, refresh_token: &str, new_token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/create_access"))
        .and(body_json(json!({ "refresh_token": refresh_token })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "access_token": new_token
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Base URL on which nothing is listening.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
