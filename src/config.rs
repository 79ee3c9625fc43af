//! Configuration types for the API client, pagination and CSV export.
//!
//! These are plain builder-style structs with no CLI framework dependencies;
//! the binary maps its arguments onto them.
//!
//! - [`ClientConfig`] - where and how to reach the Slack Web API
//! - [`PaginationConfig`] - history paging scheme, page size, rate-limit delay
//! - [`ExportConfig`] - prefix filter and CSV delimiter
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use slack2csv::config::{ExportConfig, Pagination, PaginationConfig};
//!
//! let paging = PaginationConfig::new()
//!     .with_mode(Pagination::Offset)
//!     .with_request_delay(Duration::ZERO);
//!
//! let export = ExportConfig::new().with_text_prefix("!deploy");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default Slack Web API root.
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// Default pause between consecutive page requests.
///
/// Slack's history and listing methods are Tier 3 (about 50 requests per
/// minute).
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Connection settings for [`SlackClient`](crate::api::SlackClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, without trailing slash (default: `https://slack.com/api`)
    pub base_url: String,

    /// Per-request timeout (default: 30s)
    pub timeout: Duration,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("slack2csv/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API root. Trailing slashes are removed.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

/// How the history endpoint signals continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pagination {
    /// `conversations.history`: opaque `response_metadata.next_cursor`.
    #[default]
    Cursor,

    /// Legacy `channels.history`: `has_more` plus a moving `oldest` bound.
    Offset,
}

impl Pagination {
    /// Returns the Web API method used for this scheme.
    pub fn history_method(&self) -> &'static str {
        match self {
            Pagination::Cursor => "conversations.history",
            Pagination::Offset => "channels.history",
        }
    }

    /// Returns the query parameter carrying the page size.
    pub fn page_size_param(&self) -> &'static str {
        match self {
            Pagination::Cursor => "limit",
            Pagination::Offset => "count",
        }
    }
}

impl std::fmt::Display for Pagination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pagination::Cursor => write!(f, "cursor"),
            Pagination::Offset => write!(f, "offset"),
        }
    }
}

/// Paging behaviour shared by the history paginator and the name resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Continuation scheme for history requests (default: cursor)
    pub mode: Pagination,

    /// Entries requested per page (default: 100)
    pub page_size: u32,

    /// Pause before every request after the first (default: 1s)
    pub request_delay: Duration,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            mode: Pagination::Cursor,
            page_size: 100,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

impl PaginationConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the continuation scheme.
    #[must_use]
    pub fn with_mode(mut self, mode: Pagination) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the page size. Zero is bumped to one.
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Sets the delay between requests. `Duration::ZERO` disables it.
    #[must_use]
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

/// CSV export settings.
///
/// # Example
///
/// ```rust
/// use slack2csv::config::ExportConfig;
///
/// let config = ExportConfig::new()
///     .with_text_prefix("Hey")
///     .with_delimiter(b';');
/// assert!(config.has_text_filter());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Only messages whose text starts with this are written (default: empty,
    /// matches everything)
    pub text_prefix: String,

    /// Field delimiter (default: `,`)
    pub delimiter: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            text_prefix: String::new(),
            delimiter: b',',
        }
    }
}

impl ExportConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text prefix filter.
    #[must_use]
    pub fn with_text_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.text_prefix = prefix.into();
        self
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Returns `true` if a non-empty prefix filter is configured.
    pub fn has_text_filter(&self) -> bool {
        !self.text_prefix.is_empty()
    }
}
