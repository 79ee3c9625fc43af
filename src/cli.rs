//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`PaginationMode`] - `--pagination` values
//! - [`ChannelType`] - `--types` values
//!
//! Most flags fall back to an environment variable, so the tool can be
//! driven entirely from the environment in scheduled jobs. An explicit
//! `--user` wins over a channel taken from `SLACK_CHANNEL_ID`; giving both
//! `--channel` and `--user` on the command line is an error.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};

use crate::config::{ClientConfig, DEFAULT_BASE_URL, ExportConfig, Pagination, PaginationConfig};
use crate::error::{Result, Slack2CsvError};
use crate::resolve::{ConversationType, Target};

/// Export a Slack conversation's recent history to CSV.
#[derive(Parser, Debug, Clone)]
#[command(name = "slack2csv")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    slack2csv --token xoxb-... --channel C8675309 --filename out.csv
    slack2csv --token xoxb-... --channel general --text '!deploy' --past-days 7 --filename deploys.csv
    slack2csv --token xoxb-... --user alice --filename dm.csv")]
pub struct Args {
    /// Slack API token
    #[arg(long, env = "SLACK_API_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Channel ID or name (this or --user is required)
    #[arg(long, env = "SLACK_CHANNEL_ID", value_name = "ID|NAME")]
    pub channel: Option<String>,

    /// User ID or name; exports the direct-message conversation with them
    #[arg(long, value_name = "ID|NAME")]
    pub user: Option<String>,

    /// Path to the output CSV file (overwritten)
    #[arg(long, env = "CSV_FILENAME")]
    pub filename: PathBuf,

    /// Only export messages whose text starts with this
    #[arg(long, env = "SEARCH_TEXT", default_value = "")]
    pub text: String,

    /// How many days of history to export
    #[arg(long = "past-days", visible_alias = "past_days", value_name = "DAYS", default_value_t = 1)]
    pub past_days: u32,

    /// History pagination scheme
    #[arg(long, value_enum, default_value = "cursor")]
    pub pagination: PaginationMode,

    /// Pause between API requests, in milliseconds
    #[arg(long = "delay-ms", value_name = "MS", default_value_t = 1000)]
    pub delay_ms: u64,

    /// Conversation types searched when resolving a channel name
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_value = "public-channel,private-channel"
    )]
    pub types: Vec<ChannelType>,

    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Slack API root
    #[arg(long, env = "SLACK_API_URL", default_value = DEFAULT_BASE_URL, hide = true)]
    pub base_url: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parses the process arguments, exiting with clap's usage error on
    /// failure.
    pub fn parse_args() -> Self {
        Self::try_parse_args_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parses `argv` and settles which conversation was asked for.
    ///
    /// A channel that only came from `SLACK_CHANNEL_ID` yields to `--user`.
    /// `--channel` and `--user` together on the command line conflict, and
    /// one of them (or the env channel) is required.
    pub fn try_parse_args_from<I, T>(argv: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut cmd = Self::command();
        let matches = cmd.try_get_matches_from_mut(argv)?;
        let mut args = Self::from_arg_matches(&matches).map_err(|e| e.format(&mut cmd))?;

        let channel_from_env = matches.value_source("channel") == Some(ValueSource::EnvVariable);
        match (args.channel.is_some(), args.user.is_some()) {
            (true, true) if channel_from_env => args.channel = None,
            (true, true) => {
                return Err(cmd.error(
                    ErrorKind::ArgumentConflict,
                    "the argument '--channel <ID|NAME>' cannot be used with '--user <ID|NAME>'",
                ));
            }
            (false, false) => {
                return Err(cmd.error(
                    ErrorKind::MissingRequiredArgument,
                    "one of '--channel <ID|NAME>' or '--user <ID|NAME>' is required",
                ));
            }
            _ => {}
        }

        Ok(args)
    }

    /// Returns the conversation selected by `--channel` or `--user`.
    pub fn target(&self) -> Result<Target> {
        match (&self.channel, &self.user) {
            (None, Some(user)) => Ok(Target::User(user.clone())),
            (Some(channel), None) => Ok(Target::Channel(channel.clone())),
            (Some(_), Some(_)) => Err(Slack2CsvError::invalid_argument(
                "--channel and --user are mutually exclusive",
            )),
            (None, None) => Err(Slack2CsvError::invalid_argument(
                "one of --channel or --user is required",
            )),
        }
    }

    /// Returns the lower time bound: `now` minus `--past-days`.
    pub fn oldest(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        chrono::Duration::try_days(i64::from(self.past_days))
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(|| {
                Slack2CsvError::invalid_argument(format!(
                    "--past-days {} is out of range",
                    self.past_days
                ))
            })
    }

    /// Connection settings.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new().with_base_url(self.base_url.clone())
    }

    /// Paging settings.
    pub fn pagination_config(&self) -> PaginationConfig {
        PaginationConfig::new()
            .with_mode(self.pagination.into())
            .with_request_delay(Duration::from_millis(self.delay_ms))
    }

    /// Export settings. Fails if the delimiter is not a single ASCII byte.
    pub fn export_config(&self) -> Result<ExportConfig> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                Slack2CsvError::invalid_argument(format!(
                    "delimiter '{}' must be a single ASCII character",
                    self.delimiter
                ))
            })?;

        Ok(ExportConfig::new()
            .with_text_prefix(self.text.clone())
            .with_delimiter(delimiter))
    }

    /// Conversation types for channel-name lookups.
    pub fn conversation_types(&self) -> Vec<ConversationType> {
        self.types.iter().copied().map(Into::into).collect()
    }
}

/// `--pagination` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum PaginationMode {
    /// conversations.history with response cursors
    #[default]
    Cursor,

    /// Legacy channels.history with has_more and a moving lower bound
    Offset,
}

impl From<PaginationMode> for Pagination {
    fn from(mode: PaginationMode) -> Pagination {
        match mode {
            PaginationMode::Cursor => Pagination::Cursor,
            PaginationMode::Offset => Pagination::Offset,
        }
    }
}

/// `--types` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ChannelType {
    /// Public channels
    #[value(alias = "public_channel")]
    PublicChannel,

    /// Private channels
    #[value(alias = "private_channel")]
    PrivateChannel,

    /// Multi-person direct messages
    Mpim,

    /// Direct messages
    Im,
}

impl From<ChannelType> for ConversationType {
    fn from(kind: ChannelType) -> ConversationType {
        match kind {
            ChannelType::PublicChannel => ConversationType::PublicChannel,
            ChannelType::PrivateChannel => ConversationType::PrivateChannel,
            ChannelType::Mpim => ConversationType::Mpim,
            ChannelType::Im => ConversationType::Im,
        }
    }
}
