//! Admin API Client
//!
//! Builds requests against a profile's base URL, injects its bearer token, and
//! normalizes every outcome into an [`ApiResult`].

use crate::api::error::{ApiError, ApiResult};
use crate::api::{Headers, HttpRequest, HttpResponse, Transport};
use crate::credentials::CredentialStore;
use crate::profile::{ApiProfile, BaseUrlSource};
use log::debug;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

const INVALID_JSON_MESSAGE: &str = "Invalid JSON response";

/// Method, body and extra headers of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Headers,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self::with_method(Method::POST).with_body(body)
    }

    pub fn put(body: Value) -> Self {
        Self::with_method(Method::PUT).with_body(body)
    }

    pub fn delete() -> Self {
        Self::with_method(Method::DELETE)
    }

    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[cfg(test)]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }
}

/// Client for one [`ApiProfile`]. Credentials are re-read before every request.
#[derive(Clone)]
pub struct ApiClient {
    profile: ApiProfile,
    credentials: CredentialStore,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(
        profile: ApiProfile,
        credentials: CredentialStore,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            profile,
            credentials,
            transport,
        }
    }

    /// Sends a request to `path` and decodes the whole response body into `T`.
    ///
    /// Fails without touching the network when the profile is not configured.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let request = self.prepare(path, options)?;
        debug!("[{}] {} {}", self.profile, request.method, request.url);

        let response = self.transport.send(request).await?;
        let body = Self::check_envelope(response)?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(path, RequestOptions::get()).await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> ApiResult<T> {
        self.request(path, RequestOptions::post(body)).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: Value) -> ApiResult<T> {
        self.request(path, RequestOptions::put(body)).await
    }

    fn prepare(&self, path: &str, options: RequestOptions) -> ApiResult<HttpRequest> {
        let credentials = self.credentials.get().map_err(|e| {
            ApiError::Configuration(format!("Failed to read stored credentials: {}", e))
        })?;

        let base_url = match self.profile.base_url_source() {
            BaseUrlSource::Fixed(url) => Some(url),
            BaseUrlSource::Stored(_) => credentials.base_url.clone(),
        }
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            ApiError::Configuration(self.profile.missing_base_url_message().to_string())
        })?;

        let token = credentials.bearer_token();
        if token.is_none() && self.profile.requires_token() {
            return Err(ApiError::Configuration(
                "No authentication token found".to_string(),
            ));
        }

        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        for (name, value) in options.headers {
            headers.insert(name.to_ascii_lowercase(), value);
        }
        if let Some(token) = token {
            headers.insert("authorization".to_string(), format!("Bearer {}", token));
        }

        Ok(HttpRequest {
            method: options.method,
            url: build_url(&base_url, path),
            headers,
            body: options.body.map(|body| body.to_string()),
        })
    }

    /// The `success` flag decides the outcome; the HTTP status only annotates messages.
    fn check_envelope(response: HttpResponse) -> ApiResult<Value> {
        let status = response.status;
        let (body, synthesized) = match serde_json::from_slice::<Value>(&response.body) {
            Ok(body) => (body, false),
            Err(_) => (
                json!({ "success": false, "message": INVALID_JSON_MESSAGE }),
                true,
            ),
        };

        if is_truthy(body.get("success")) {
            return Ok(body);
        }

        let message = failure_message(&body, status);
        if synthesized {
            Err(ApiError::Transport(format!("{} (HTTP {})", message, status)))
        } else {
            Err(ApiError::Rejected { status, message })
        }
    }
}

fn build_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn failure_message(body: &Value, status: u16) -> String {
    fn readable(value: Option<&Value>) -> Option<String> {
        match value? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    readable(body.get("message"))
        .or_else(|| readable(body.get("detail")))
        .unwrap_or_else(|| format!("Request failed (HTTP {})", status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTransport;
    use crate::credentials::Credentials;
    use crate::test_support::{console_client, json_response, storage_in};
    use serde::Deserialize;
    use tempfile::tempdir;

    fn unconfigured_mock() -> MockTransport {
        let mut transport = MockTransport::new();
        transport.expect_send().times(0);
        transport
    }

    #[tokio::test]
    async fn test_missing_base_url_fails_without_network_call() {
        let dir = tempdir().unwrap();
        let client = ApiClient::new(
            ApiProfile::Console,
            CredentialStore::new(storage_in(&dir), ApiProfile::Console),
            Arc::new(unconfigured_mock()),
        );

        let result = client.get::<Value>("/admin/analytics").await;

        match result {
            Err(ApiError::Configuration(message)) => {
                assert!(message.contains("Configure API base URL"))
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_base_url_counts_as_unconfigured() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(storage_in(&dir), ApiProfile::Console);
        store
            .set(&Credentials::default().with_base_url("").with_token("t"))
            .unwrap();
        let client = ApiClient::new(ApiProfile::Console, store, Arc::new(unconfigured_mock()));

        let result = client.get::<Value>("/payouts").await;

        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_legacy_profile_requires_token_before_sending() {
        let dir = tempdir().unwrap();
        let client = ApiClient::new(
            ApiProfile::Legacy,
            CredentialStore::new(storage_in(&dir), ApiProfile::Legacy),
            Arc::new(unconfigured_mock()),
        );

        let result = client.get::<Value>("/admin/tasks/").await;

        assert_eq!(
            result,
            Err(ApiError::Configuration(
                "No authentication token found".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_token_is_injected_over_caller_headers() {
        let dir = tempdir().unwrap();
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.url == "http://api.test/admin/users/7/suspend?suspend=true"
                    && req.method == Method::PATCH
                    && req.header("Authorization") == Some("Bearer tok")
                    && req.header("content-type") == Some("text/plain")
                    && req.header("x-trace") == Some("abc")
            })
            .times(1)
            .returning(|_| Ok(json_response(200, json!({ "success": true }))));
        let client = console_client(&dir, transport);

        let options = RequestOptions::with_method(Method::PATCH)
            .with_header("Content-Type", "text/plain")
            .with_header("Authorization", "Bearer forged")
            .with_header("X-Trace", "abc");
        let result = client
            .request::<Value>("/admin/users/7/suspend?suspend=true", options)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_no_authorization_header_without_token() {
        let dir = tempdir().unwrap();
        CredentialStore::new(storage_in(&dir), ApiProfile::Console)
            .set(&Credentials::default().with_base_url("http://api.test/"))
            .unwrap();
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.header("authorization").is_none()
                    && req.header("content-type") == Some("application/json")
                    && req.url == "http://api.test/payouts"
            })
            .times(1)
            .returning(|_| Ok(json_response(200, json!({ "success": 1, "data": [] }))));
        let client = ApiClient::new(
            ApiProfile::Console,
            CredentialStore::new(storage_in(&dir), ApiProfile::Console),
            Arc::new(transport),
        );

        assert!(client.get::<Value>("/payouts").await.is_ok());
    }

    #[tokio::test]
    async fn test_success_false_is_failure_despite_http_ok() {
        let dir = tempdir().unwrap();
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| {
            Ok(json_response(
                200,
                json!({ "success": false, "message": "Payout not found" }),
            ))
        });
        let client = console_client(&dir, transport);

        let result = client.post::<Value>("/payouts/1/approve", json!({})).await;

        assert_eq!(
            result,
            Err(ApiError::Rejected {
                status: 200,
                message: "Payout not found".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_success_flag_wins_over_error_status() {
        let dir = tempdir().unwrap();
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json_response(500, json!({ "success": true, "n": 3 }))));
        let client = console_client(&dir, transport);

        let body: Value = client.get("/x").await.unwrap();

        assert_eq!(body["n"], 3);
    }

    #[tokio::test]
    async fn test_detail_is_used_when_message_missing() {
        let dir = tempdir().unwrap();
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| {
            Ok(json_response(
                401,
                json!({ "success": false, "message": "", "detail": "Not authenticated" }),
            ))
        });
        let client = console_client(&dir, transport);

        let error = client.get::<Value>("/admin/analytics").await.unwrap_err();

        assert_eq!(error.to_string(), "Not authenticated");
        assert_eq!(error.status(), Some(401));
    }

    #[tokio::test]
    async fn test_generic_message_carries_status() {
        let dir = tempdir().unwrap();
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json_response(503, json!({ "error": "down" }))));
        let client = console_client(&dir, transport);

        let error = client.get::<Value>("/payouts").await.unwrap_err();

        assert_eq!(error.to_string(), "Request failed (HTTP 503)");
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_transport_failure() {
        let dir = tempdir().unwrap();
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(HttpResponse::new(502, "<html>Bad Gateway</html>")));
        let client = console_client(&dir, transport);

        let error = client.get::<Value>("/payouts").await.unwrap_err();

        assert_eq!(
            error,
            ApiError::Transport("Invalid JSON response (HTTP 502)".to_string())
        );
    }

    #[tokio::test]
    async fn test_transport_errors_are_returned_as_is() {
        let dir = tempdir().unwrap();
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Err(ApiError::Transport("connection refused".to_string())));
        let client = console_client(&dir, transport);

        let error = client.get::<Value>("/payouts").await.unwrap_err();

        assert_eq!(error.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_body_is_serialized_json_and_decoded_into_type() {
        #[derive(Deserialize)]
        struct Created {
            data: CreatedData,
        }
        #[derive(Deserialize)]
        struct CreatedData {
            count: u32,
        }

        let dir = tempdir().unwrap();
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == Method::POST
                    && req
                        .body
                        .as_deref()
                        .and_then(|body| serde_json::from_str::<Value>(body).ok())
                        == Some(json!({ "subject": "hi", "to_all": true }))
            })
            .returning(|_| {
                Ok(json_response(
                    200,
                    json!({ "success": true, "data": { "count": 12 } }),
                ))
            });
        let client = console_client(&dir, transport);

        let created: Created = client
            .post(
                "/admin/emails/send",
                json!({ "subject": "hi", "to_all": true }),
            )
            .await
            .unwrap();

        assert_eq!(created.data.count, 12);
    }

    #[test]
    fn test_truthiness_follows_json_semantics() {
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(is_truthy(Some(&json!(2))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&Value::Null)));
        assert!(!is_truthy(None));
    }

    #[test]
    fn test_build_url_joins_single_slash() {
        assert_eq!(build_url("http://h/api/", "/tasks"), "http://h/api/tasks");
        assert_eq!(build_url("http://h/api", "tasks/"), "http://h/api/tasks/");
    }
}
