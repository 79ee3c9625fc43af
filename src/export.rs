//! CSV export of a message sequence.
//!
//! [`CsvExporter`] consumes messages one at a time, drops the ones that
//! should not appear in the output, and writes the rest as CSV rows.
//!
//! # Filters
//!
//! A message is skipped when, in this order:
//! 1. its subtype is `bot_message`;
//! 2. it has no `user`;
//! 3. its text does not start with the configured prefix (an empty prefix
//!    matches every message, including ones with no text).
//!
//! # Columns
//!
//! The first message that passes the filters fixes the column set: its field
//! names, sorted. The header is written at that point, exactly once. Later
//! messages contribute one value per column, empty where the field is
//! missing; fields outside the column set are not written.
//!
//! # Example
//!
//! ```rust
//! use slack2csv::Message;
//! use slack2csv::config::ExportConfig;
//! use slack2csv::export::CsvExporter;
//!
//! # fn main() -> slack2csv::Result<()> {
//! let messages = vec![
//!     Ok(Message::new("1513173325.000024").with_user("U1").with_text("Hey!")),
//!     Ok(Message::new("1513173326.000001").with_subtype("bot_message").with_text("beep")),
//! ];
//!
//! let mut exporter = CsvExporter::from_writer(Vec::new(), &ExportConfig::new());
//! let stats = exporter.export(messages)?;
//! assert_eq!(stats.rows, 1);
//!
//! let csv = String::from_utf8(exporter.into_inner()?).unwrap();
//! assert_eq!(csv, "text,ts,user\nHey!,1513173325.000024,U1\n");
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::Message;
use crate::config::ExportConfig;
use crate::error::{Result, Slack2CsvError};

/// Why a message was left out of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Posted by a bot or integration.
    Bot,
    /// No `user` field.
    NoAuthor,
    /// Text does not start with the configured prefix.
    TextMismatch,
}

/// Counts for a finished (or aborted) export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Rows written, not counting the header.
    pub rows: usize,
    /// Messages skipped as bot messages.
    pub skipped_bot: usize,
    /// Messages skipped for having no author.
    pub skipped_no_author: usize,
    /// Messages skipped by the text prefix filter.
    pub skipped_text: usize,
}

impl ExportStats {
    /// Returns the number of messages skipped for any reason.
    pub fn skipped(&self) -> usize {
        self.skipped_bot + self.skipped_no_author + self.skipped_text
    }

    /// Returns the number of messages seen.
    pub fn seen(&self) -> usize {
        self.rows + self.skipped()
    }

    fn count(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::Bot => self.skipped_bot += 1,
            Rejection::NoAuthor => self.skipped_no_author += 1,
            Rejection::TextMismatch => self.skipped_text += 1,
        }
    }
}

/// Streaming CSV writer for Slack messages.
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
    text_prefix: String,
    columns: Option<Vec<String>>,
    stats: ExportStats,
}

impl CsvExporter<File> {
    /// Creates (or truncates) `path` and returns an exporter writing to it.
    pub fn create(path: impl AsRef<Path>, config: &ExportConfig) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "output file opened");
        Ok(Self::from_writer(file, config))
    }
}

impl<W: Write> CsvExporter<W> {
    /// Wraps any writer.
    pub fn from_writer(writer: W, config: &ExportConfig) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(config.delimiter)
            .from_writer(writer);

        Self {
            writer,
            text_prefix: config.text_prefix.clone(),
            columns: None,
            stats: ExportStats::default(),
        }
    }

    /// Decides whether `msg` belongs in the output.
    pub fn check(&self, msg: &Message) -> std::result::Result<(), Rejection> {
        if msg.is_bot_message() {
            return Err(Rejection::Bot);
        }
        if msg.author().is_none() {
            return Err(Rejection::NoAuthor);
        }
        if !msg.text().unwrap_or_default().starts_with(&self.text_prefix) {
            return Err(Rejection::TextMismatch);
        }
        Ok(())
    }

    /// Returns `true` if `msg` passes every filter.
    pub fn accepts(&self, msg: &Message) -> bool {
        self.check(msg).is_ok()
    }

    /// Writes `msg` if it passes the filters.
    ///
    /// Returns `true` if a row was written. The first accepted message also
    /// writes the header.
    pub fn write_message(&mut self, msg: &Message) -> Result<bool> {
        if let Err(rejection) = self.check(msg) {
            self.stats.count(rejection);
            return Ok(false);
        }

        if self.columns.is_none() {
            let columns = msg.field_names();
            self.writer.write_record(&columns)?;
            debug!(?columns, "header written");
            self.columns = Some(columns);
        }

        let record: Vec<String> = self
            .columns
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|name| msg.field(name).unwrap_or_default())
            .collect();
        self.writer.write_record(&record)?;

        self.stats.rows += 1;
        Ok(true)
    }

    /// Drains `messages`, writing every accepted one.
    ///
    /// Stops at the first error in the sequence. The output is flushed on
    /// every path, so rows written before an error stay on disk.
    pub fn export<I>(&mut self, messages: I) -> Result<ExportStats>
    where
        I: IntoIterator<Item = Result<Message>>,
    {
        let outcome = messages
            .into_iter()
            .try_for_each(|msg| self.write_message(&msg?).map(|_| ()));
        let flushed = self.flush();

        outcome?;
        flushed?;
        Ok(self.stats)
    }

    /// Returns the fixed column set, once the header has been written.
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Returns the counts so far.
    pub fn stats(&self) -> ExportStats {
        self.stats
    }

    /// Flushes buffered rows to the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Slack2CsvError::Io(e.into_error()))
    }
}

/// Writes `messages` to a new CSV file at `path`.
///
/// Shorthand for [`CsvExporter::create`] followed by [`CsvExporter::export`].
pub fn write_csv<I>(messages: I, path: impl AsRef<Path>, config: &ExportConfig) -> Result<ExportStats>
where
    I: IntoIterator<Item = Result<Message>>,
{
    CsvExporter::create(path, config)?.export(messages)
}
