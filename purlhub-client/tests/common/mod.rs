#![allow(dead_code)]

use purlhub_client::{Api, ApiConfig};
use serde_json::{json, Value};
use std::sync::Once;
use wiremock::{MockServer, ResponseTemplate};

pub const LOGIN: &str = "admin";
pub const PASSWORD: &str = "secret";

/// Config pointed at a mock server. `ApiConfig::new` only accepts purlHub
/// hosts, so the struct is filled in directly.
pub fn mock_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        login: LOGIN.to_string(),
        password: PASSWORD.to_string(),
        ..Default::default()
    }
}

pub fn mock_api(server: &MockServer) -> Api {
    init_tracing();
    Api::new(mock_config(server)).unwrap()
}

/// A 200 reply wrapped in the purlHub response envelope.
pub fn envelope(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "response": { "data": data } }))
}

/// Like [`envelope`], with the `purlCode` object writes report.
pub fn written(data: Value, purl_code: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({ "response": { "data": data, "purlCode": purl_code } }))
}

/// A listing page with its reported total.
pub fn page(items: Vec<Value>, total: u64) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({ "response": { "data": items, "total": total } }))
}

pub fn error_reply(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "response": { "message": message } }))
}

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
