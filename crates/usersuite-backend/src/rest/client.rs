//! Token-authenticated HTTP client for REST identity backends
//!
//! Every call is an independent, blocking-for-the-request operation; there
//! is no retry and no connection state beyond reqwest's own pooling. A
//! non-success status is fatal for the call. Successful bodies are kept as
//! an explicit tagged reply so callers must handle structured and opaque
//! answers deliberately.

use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use usersuite_core::{AppError, AppResult};

/// A backend reply: structured record or opaque text
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    /// The body parsed as JSON
    Record(Value),
    /// The body was not valid JSON; kept verbatim
    Text(String),
}

impl ApiReply {
    /// The reply's string content, whether quoted JSON or plain text
    ///
    /// Sentinels like `"NoAccount"` arrive in either shape depending on the
    /// backend's content type.
    pub fn as_sentinel(&self) -> Option<&str> {
        match self {
            ApiReply::Record(Value::String(s)) => Some(s.as_str()),
            ApiReply::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The structured record, failing for opaque text replies
    pub fn into_record(self) -> AppResult<Value> {
        match self {
            ApiReply::Record(value) => Ok(value),
            ApiReply::Text(text) => Err(AppError::Backend(format!(
                "expected structured reply, got text: {:.60}",
                text
            ))),
        }
    }

    /// Whether the reply counts as a positive answer
    ///
    /// Mirrors the truthiness the auth endpoint relies on: null, `false`,
    /// zero, and empty strings/collections are negative.
    pub fn is_truthy(&self) -> bool {
        match self {
            ApiReply::Record(value) => match value {
                Value::Null => false,
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
                Value::String(s) => !s.is_empty(),
                Value::Array(a) => !a.is_empty(),
                Value::Object(o) => !o.is_empty(),
            },
            ApiReply::Text(text) => !text.is_empty(),
        }
    }
}

/// Interpret a response body as a tagged reply
pub(crate) fn interpret_body(body: &str) -> ApiReply {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => ApiReply::Record(value),
        Err(_) => ApiReply::Text(body.to_string()),
    }
}

/// HTTP client bound to one division's endpoint and token
#[derive(Debug, Clone)]
pub struct RestClient {
    endpoint: Url,
    token: String,
    http: Client,
}

impl RestClient {
    /// Create a client for `endpoint`, validating the URL up front
    pub fn new(endpoint: &str, token: &str, accept_invalid_certs: bool) -> AppResult<Self> {
        // A missing trailing slash would make Url::join swallow the last
        // path segment.
        let normalized = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{}/", endpoint)
        };
        let endpoint = Url::parse(&normalized)
            .map_err(|e| AppError::Config(format!("invalid backend endpoint '{}': {}", endpoint, e)))?;

        if accept_invalid_certs {
            warn!(endpoint = %endpoint, "Accepting invalid backend certificates");
        }

        let http = Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            endpoint,
            token: token.to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> AppResult<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| AppError::Backend(format!("invalid request path '{}': {}", path, e)))
    }

    fn auth_header(&self) -> String {
        format!("Token token={}", self.token)
    }

    /// GET `path` with query parameters
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> AppResult<ApiReply> {
        let request = self
            .http
            .get(self.url(path)?)
            .query(query)
            .header("Authorization", self.auth_header());

        self.dispatch(request).await
    }

    /// POST form data to `path`
    #[instrument(skip(self, form), fields(endpoint = %self.endpoint))]
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> AppResult<ApiReply> {
        let request = self
            .http
            .post(self.url(path)?)
            .form(form)
            .header("Authorization", self.auth_header());

        self.dispatch(request).await
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder) -> AppResult<ApiReply> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("request failed: {}", e)))?;

        self.read_reply(response).await
    }

    async fn read_reply(&self, response: Response) -> AppResult<ApiReply> {
        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Backend returned non-success status");
            return Err(AppError::Backend(format!(
                "backend returned status {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Backend(format!("failed to read reply body: {}", e)))?;

        let reply = interpret_body(&body);
        debug!(
            structured = matches!(reply, ApiReply::Record(_)),
            "Backend reply received"
        );
        Ok(reply)
    }
}
