//! Slack Web API access.
//!
//! [`SlackApi`] is the seam between the paging logic and the network: one
//! call, one JSON response, already checked for `"ok": true`. [`SlackClient`]
//! implements it over a blocking `reqwest` client.
//!
//! The response shapes the pipeline depends on are decoded with serde into
//! [`HistoryPage`] and [`ListPage`]; a response that does not fit is reported
//! as [`Slack2CsvError::MalformedResponse`].

use std::fmt;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::Message;
use crate::config::ClientConfig;
use crate::error::{Result, Slack2CsvError};

/// A synchronous Slack Web API transport.
///
/// Implementations return the decoded JSON body of a successful call. A
/// response with `"ok": false` must be turned into
/// [`Slack2CsvError::Api`] carrying Slack's `error` text.
pub trait SlackApi {
    /// Calls `method` with the given query parameters.
    fn call(&self, method: &str, params: &[(&str, String)]) -> Result<Value>;
}

impl<T: SlackApi + ?Sized> SlackApi for &T {
    fn call(&self, method: &str, params: &[(&str, String)]) -> Result<Value> {
        (**self).call(method, params)
    }
}

/// Blocking HTTP client for the Slack Web API.
///
/// Sends `GET {base_url}/{method}?token=...&...` and expects a JSON object.
///
/// # Example
///
/// ```rust,no_run
/// use slack2csv::api::{SlackApi, SlackClient};
///
/// # fn main() -> slack2csv::Result<()> {
/// let client = SlackClient::new("xoxb-...")?;
/// let body = client.call("auth.test", &[])?;
/// println!("{}", body["team"]);
/// # Ok(())
/// # }
/// ```
pub struct SlackClient {
    http: reqwest::blocking::Client,
    token: String,
    base_url: String,
}

impl SlackClient {
    /// Creates a client against the public Slack API.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(token, &ClientConfig::default())
    }

    /// Creates a client with explicit connection settings.
    pub fn with_config(token: impl Into<String>, config: &ClientConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            token: token.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl SlackApi for SlackClient {
    fn call(&self, method: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(method, ?params, "GET");

        let response = self
            .http
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .query(params)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(Slack2CsvError::http_status(method, status.as_u16(), body));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| Slack2CsvError::malformed(method, format!("invalid JSON: {e}")))?;

        check_ok(method, value)
    }
}

/// Checks the `ok` flag of a Web API response.
///
/// Returns the response unchanged when `ok` is true. `"ok": false` becomes
/// [`Slack2CsvError::Api`] with the response's `error` text; a missing or
/// non-boolean `ok` is a malformed response.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use slack2csv::api::check_ok;
///
/// let err = check_ok("conversations.history", json!({"ok": false, "error": "boom"})).unwrap_err();
/// assert!(err.to_string().contains("boom"));
/// ```
pub fn check_ok(method: &str, value: Value) -> Result<Value> {
    let ok = match value.get("ok") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        Some(_) => return Err(Slack2CsvError::malformed(method, "'ok' is not a boolean")),
        None => return Err(Slack2CsvError::malformed(method, "missing 'ok' flag")),
    };

    if ok {
        return Ok(value);
    }

    let message = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown_error");
    Err(Slack2CsvError::api(method, message))
}

/// Decodes a checked response into a typed page.
pub fn decode<T: DeserializeOwned>(method: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Slack2CsvError::malformed(method, e.to_string()))
}

/// Continuation metadata for cursor-paginated methods.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMetadata {
    /// Opaque cursor for the next page; empty or absent on the last page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl ResponseMetadata {
    /// Returns the cursor for the next page, if there is one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// One page of `conversations.history` / `channels.history`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPage {
    /// Messages on this page, in whatever order Slack sent them.
    pub messages: Vec<Message>,

    /// Offset pagination: more messages exist past this page.
    #[serde(default)]
    pub has_more: bool,

    /// Cursor pagination metadata.
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl HistoryPage {
    /// Returns the cursor for the next page, if there is one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.response_metadata.as_ref().and_then(ResponseMetadata::next_cursor)
    }
}

/// One page of a listing method (`conversations.list`, `users.list`).
///
/// Entries are kept as raw JSON objects; the resolver only reads a few
/// string fields from them.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage {
    /// Listed entries.
    #[serde(alias = "channels", alias = "members")]
    pub entries: Vec<Value>,

    /// Cursor pagination metadata.
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl ListPage {
    /// Returns the cursor for the next page, if there is one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.response_metadata.as_ref().and_then(ResponseMetadata::next_cursor)
    }
}
