//! HTTP transport shared by every store.
//!
//! Every purlHub response wraps its payload in
//! `{ "response": { "data": ..., "total": n, "purlCode": s } }`.

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::throttle::Throttle;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// The unwrapped `response` member of a purlHub reply.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(default)]
    pub data: Value,
    /// Total match count reported by listing endpoints.
    #[serde(default)]
    pub total: Option<u64>,
    /// Identifier assigned or confirmed by object writes.
    #[serde(default, deserialize_with = "deserialize_purl_code")]
    pub purl_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiResponse {
    /// The `data` payload; a `null` payload means nothing matched. The
    /// server's `message` is used for the error when it sent one.
    pub fn into_data(self, what: &str) -> ApiResult<Value> {
        match self.data {
            Value::Null => Err(ApiError::NotFound(
                self.message.unwrap_or_else(|| format!("{what} Not Found!")),
            )),
            data => Ok(data),
        }
    }

    /// The `data` payload as a list. Accepts a bare array, an object with a
    /// `list` member, or `null` (empty).
    pub fn into_list(self) -> ApiResult<Vec<Value>> {
        match self.data {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            Value::Object(mut map) => match map.remove("list") {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(ApiError::InvalidResponse(
                    "expected a list in response data".to_string(),
                )),
            },
            other => Err(ApiError::InvalidResponse(format!(
                "expected a list in response data, got {other}"
            ))),
        }
    }
}

/// Codes are strings, but some endpoints send numeric ones.
fn deserialize_purl_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(code) if !code.is_empty() => Some(code),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    })
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: ApiResponse,
}

/// Authenticated, throttled HTTP client bound to one API root.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    login: String,
    password: String,
    throttle: Arc<Throttle>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, throttle: Arc<Throttle>) -> ApiResult<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login: config.login.clone(),
            password: config.password.clone(),
            throttle,
        })
    }

    /// The API root requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The throttle gating this client's requests.
    pub fn throttle(&self) -> &Arc<Throttle> {
        &self.throttle
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> ApiResult<ApiResponse> {
        self.execute(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> ApiResult<ApiResponse> {
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    pub async fn delete(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> ApiResult<ApiResponse> {
        self.execute(Method::DELETE, path, query, body).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> ApiResult<ApiResponse> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let mut request = self
            .http
            .request(method.clone(), &url)
            .basic_auth(&self.login, Some(&self.password));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let _permit = self.throttle.acquire().await?;
        debug!("{} {}", method, url);

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        trace!("{} {} -> {}: {}", method, url, status, text);

        if !status.is_success() {
            let message = error_message(&text)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            if status.as_u16() == 404 {
                return Err(ApiError::NotFound(message));
            }
            return Err(ApiError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope = serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("{method} {path}: missing response envelope ({e})"))
        })?;
        Ok(envelope.response)
    }
}

/// Pulls a human readable message out of an error body, if it has one.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(json) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_string());
    };
    [
        json.pointer("/response/message"),
        json.pointer("/message"),
        json.pointer("/error"),
    ]
    .into_iter()
    .flatten()
    .find_map(|v| v.as_str().map(str::to_string))
}

/// Deserializes a response payload into a typed model.
pub(crate) fn from_data<T: DeserializeOwned>(data: Value) -> ApiResult<T> {
    serde_json::from_value(data)
        .map_err(|e| ApiError::InvalidResponse(format!("unexpected payload: {e}")))
}

/// Percent-encodes each `/`-separated segment of a path.
pub(crate) fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_envelope_message() {
        let body = r#"{"response":{"message":"purlCode taken"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("purlCode taken"));
    }

    #[test]
    fn error_message_falls_back_to_text() {
        assert_eq!(error_message(" Bad Gateway ").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message(""), None);
        assert_eq!(error_message(r#"{"other":1}"#), None);
    }

    #[test]
    fn envelope_accepts_numeric_purl_code() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"response":{"data":{},"purlCode":12345}}"#).unwrap();
        assert_eq!(envelope.response.purl_code.as_deref(), Some("12345"));

        let envelope: Envelope =
            serde_json::from_str(r#"{"response":{"data":{},"purlCode":null}}"#).unwrap();
        assert_eq!(envelope.response.purl_code, None);
    }

    #[test]
    fn null_data_uses_server_message() {
        let response = ApiResponse {
            message: Some("Profile Not Found!".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            response.into_data("object X"),
            Err(ApiError::NotFound(ref m)) if m == "Profile Not Found!"
        ));

        let err = ApiResponse::default().into_data("object X").unwrap_err();
        assert_eq!(err.to_string(), "Not Found: object X Not Found!");
    }

    #[test]
    fn encode_path_keeps_separators() {
        assert_eq!(encode_path("default/Sales Team"), "default/Sales%20Team");
        assert_eq!(encode_path("a b.html"), "a%20b.html");
    }
}
