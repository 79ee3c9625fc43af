//! # slack2csv
//!
//! Export a Slack conversation's message history to CSV.
//!
//! ## Overview
//!
//! The export is a three-step pipeline:
//!
//! 1. **Resolve** — turn a channel or user name into a conversation ID
//!    ([`resolve::Resolver`]). IDs pass straight through.
//! 2. **Paginate** — page through the conversation's history from a lower
//!    time bound, lazily, oldest message first ([`paginate::Paginator`]).
//! 3. **Export** — drop bot messages, author-less messages and messages that
//!    don't start with the search prefix, then write the rest as CSV
//!    ([`export::CsvExporter`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! use slack2csv::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let client = SlackClient::new("xoxb-...")?;
//!     let paging = PaginationConfig::new();
//!
//!     let channel = Resolver::new(&client, &paging)
//!         .channel_id("general")?
//!         .ok_or_else(|| Slack2CsvError::unresolved("channel", "general"))?;
//!
//!     let since = Utc::now() - Duration::days(7);
//!     let messages = Paginator::new(&client, channel, since, &paging);
//!
//!     let config = ExportConfig::new().with_text_prefix("!deploy");
//!     let stats = CsvExporter::create("deploys.csv", &config)?.export(messages)?;
//!     println!("{} rows", stats.rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`api`] — [`SlackApi`](api::SlackApi) transport trait and the blocking
//!   [`SlackClient`](api::SlackClient)
//! - [`resolve`] — name → ID lookups
//! - [`paginate`] — lazy history iterator and [`FetchStats`](paginate::FetchStats)
//! - [`export`] — filtering CSV writer and [`ExportStats`](export::ExportStats)
//! - [`message`] — the [`Message`] record and Slack timestamp helpers
//! - [`config`] — client, pagination and export settings
//! - [`progress`] — progress callback types
//! - [`error`] — [`Slack2CsvError`] and [`Result`]
//! - `cli` — clap argument definitions (feature `cli`)

pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod message;
pub mod paginate;
pub mod progress;
pub mod resolve;

// Re-export the main types at the crate root for convenience
pub use error::{Result, Slack2CsvError};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use slack2csv::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Message;

    pub use crate::error::{Result, Slack2CsvError};

    pub use crate::api::{SlackApi, SlackClient};
    pub use crate::config::{ClientConfig, ExportConfig, Pagination, PaginationConfig};
    pub use crate::export::{CsvExporter, ExportStats, write_csv};
    pub use crate::paginate::{FetchStats, Paginator};
    pub use crate::progress::{Progress, ProgressCallback};
    pub use crate::resolve::{ConversationType, Resolver, Target};
}
