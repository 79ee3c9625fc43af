//! Progress reporting for paginated fetches.
//!
//! The paginator pushes a [`Progress`] snapshot through a
//! [`ProgressCallback`] after every page it receives. The library never draws
//! anything itself; the binary turns these updates into a terminal spinner.
//!
//! # Example
//!
//! ```rust
//! use slack2csv::progress::{Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     eprintln!("{} pages, {} messages", progress.pages_fetched, progress.messages_fetched);
//! });
//!
//! callback(Progress::new(1, 100));
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Snapshot of a paginated fetch in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Number of API pages received so far.
    pub pages_fetched: usize,

    /// Number of messages received so far (before export filtering).
    pub messages_fetched: usize,

    /// Newest message timestamp seen so far.
    pub newest: Option<DateTime<Utc>>,
}

impl Progress {
    /// Creates a new progress instance.
    pub fn new(pages_fetched: usize, messages_fetched: usize) -> Self {
        Self {
            pages_fetched,
            messages_fetched,
            newest: None,
        }
    }

    /// Sets the newest timestamp seen.
    #[must_use]
    pub fn with_newest(mut self, newest: Option<DateTime<Utc>>) -> Self {
        self.newest = newest;
        self
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} messages in {} pages",
            self.messages_fetched, self.pages_fetched
        )?;
        if let Some(newest) = self.newest {
            write!(f, " (up to {})", newest.format("%Y-%m-%d %H:%M:%S"))?;
        }
        Ok(())
    }
}

/// Callback type for receiving progress updates.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}
