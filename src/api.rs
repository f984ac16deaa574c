//! HTTP transport shared by every news source.
//!
//! Adapters never talk to `reqwest` directly. They build an [`HttpRequest`]
//! and hand it to an [`HttpClient`], which is responsible for one thing
//! beyond moving bytes: turning every failure into an [`ApiError`] before the
//! adapter sees it.
//!
//! # Error Normalization
//!
//! | Situation | `message` | `status` |
//! |-----------|-----------|----------|
//! | No response (connect/DNS failure) | fixed "no response" message | `None` |
//! | Timeout | "Request timed out after N ms" | `None` |
//! | Non-2xx with a recognizable error body | provider's message | `Some(code)` |
//! | Non-2xx otherwise | "Request failed with status N" | `Some(code)` |
//!
//! Requests are never retried here; a failed call is reported once and the
//! user decides whether to search again.

use crate::error::{ApiError, NO_RESPONSE_MESSAGE, UNEXPECTED_ERROR_MESSAGE};
use crate::utils::truncate_for_log;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// Timeout applied to each provider call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Boxed future returned by [`HttpClient::execute`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse, ApiError>> + Send + 'a>>;

/// A GET request with query parameters.
///
/// `url` carries no query string; parameters are kept separately so they can
/// be inspected in tests and so credentials never end up in log lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// GET `url` with no parameters and the [`DEFAULT_TIMEOUT`].
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a query parameter.
    ///
    /// # Arguments
    ///
    /// * `name` - Parameter name, sent as is
    /// * `value` - Anything printable; encoded when the URL is built
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Value of the first query parameter called `name`.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Full URL with the query string appended.
    pub fn full_url(&self) -> Result<Url, ApiError> {
        Url::parse_with_params(&self.url, &self.query)
            .map_err(|e| ApiError::new(format!("invalid request URL {}: {e}", self.url)))
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// A 200 response carrying `body`.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Transport contract used by the source adapters.
///
/// Implementations resolve to `Ok` only for 2xx responses; everything else
/// must already be an [`ApiError`].
pub trait HttpClient: Send + Sync {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a>;
}

/// Production client backed by a single shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build the client with a `newshub/<version>` user agent.
    ///
    /// Falls back to a default `reqwest::Client` if the builder is rejected.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("newshub/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Wrap an existing client, e.g. one with custom TLS or proxy settings.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        Box::pin(send(&self.client, request))
    }
}

#[instrument(level = "debug", skip_all, fields(url = %request.url))]
async fn send(client: &reqwest::Client, request: HttpRequest) -> Result<HttpResponse, ApiError> {
    let t0 = Instant::now();
    let url = request.full_url()?;

    let response = client
        .get(url)
        .header("accept", "application/json")
        .timeout(request.timeout)
        .send()
        .await
        .map_err(|e| {
            let elapsed_ms = t0.elapsed().as_millis() as u64;
            warn!(elapsed_ms, error = %e, "Request produced no response");
            transport_error(&e, request.timeout)
        })?;

    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| {
        warn!(status, error = %e, "Failed to read response body");
        ApiError::new(format!("failed to read response body: {e}")).with_status(status)
    })?;

    let elapsed_ms = t0.elapsed().as_millis() as u64;
    if !(200..300).contains(&status) {
        let err = error_from_response(status, &body);
        warn!(
            status,
            elapsed_ms,
            message = %err.message,
            body_preview = %truncate_for_log(&body, 300),
            "Provider returned an error status"
        );
        return Err(err);
    }

    debug!(status, elapsed_ms, bytes = body.len(), "Request succeeded");
    Ok(HttpResponse { status, body })
}

fn transport_error(e: &reqwest::Error, timeout: Duration) -> ApiError {
    if e.is_timeout() {
        ApiError::new(format!(
            "Request timed out after {} ms",
            timeout.as_millis()
        ))
    } else if e.is_connect() || e.is_request() {
        ApiError::new(NO_RESPONSE_MESSAGE)
    } else if e.is_builder() {
        ApiError::new(e.to_string())
    } else {
        ApiError::new(UNEXPECTED_ERROR_MESSAGE)
    }
}

/// Build the [`ApiError`] for a non-2xx response.
///
/// Recognizes the error envelopes of the supported providers:
/// `{"message": ..}` (NewsAPI, most gateways), `{"response": {"message": ..}}`
/// (Guardian), `{"errors": [..]}` (GNews) and `{"fault": {"faultstring": ..}}`
/// (NYT's API gateway).
pub fn error_from_response(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| provider_message(&v))
        .unwrap_or_else(|| format!("Request failed with status {status}"));
    ApiError::new(message).with_status(status)
}

fn provider_message(v: &Value) -> Option<String> {
    let candidates = [
        v.get("message"),
        v.pointer("/response/message"),
        v.pointer("/errors/0"),
        v.pointer("/fault/faultstring"),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url_encodes_query() {
        let request = HttpRequest::get("https://content.guardianapis.com/search")
            .with_query("q", "rust & go")
            .with_query("page", 2);
        let url = request.full_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://content.guardianapis.com/search?q=rust+%26+go&page=2"
        );
        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(request.query_value("missing"), None);
    }

    #[test]
    fn test_invalid_url_is_api_error() {
        let err = HttpRequest::get("not a url").full_url().unwrap_err();
        assert!(err.message.contains("invalid request URL"));
        assert_eq!(err.status, None);
    }

    #[test]
    fn test_error_from_response_uses_top_level_message() {
        let err = error_from_response(401, r#"{"status":"error","message":"Your API key is invalid."}"#);
        assert_eq!(err.message, "Your API key is invalid.");
        assert_eq!(err.status, Some(401));
    }

    #[test]
    fn test_error_from_response_understands_provider_envelopes() {
        let guardian = error_from_response(
            400,
            r#"{"response":{"status":"error","message":"Invalid page-size"}}"#,
        );
        assert_eq!(guardian.message, "Invalid page-size");

        let gnews = error_from_response(403, r#"{"errors":["Daily quota exceeded"]}"#);
        assert_eq!(gnews.message, "Daily quota exceeded");

        let nyt = error_from_response(
            401,
            r#"{"fault":{"faultstring":"Invalid ApiKey","detail":{}}}"#,
        );
        assert_eq!(nyt.message, "Invalid ApiKey");
    }

    #[test]
    fn test_error_from_response_falls_back_to_status() {
        let err = error_from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.message, "Request failed with status 502");
        assert_eq!(err.status, Some(502));
        assert_eq!(err.provider, None);
    }
}
