//! Name → ID resolution.
//!
//! Users pass either a Slack ID (`C024BE91L`, `U0012345`) or a human name
//! (`general`, `alice`). [`Resolver`] turns names into IDs by paging through
//! the listing methods until a match turns up or the listing runs out.
//!
//! # Matching
//!
//! Matching is **exact and case-sensitive** on the entry's `name` field, for
//! conversations and users alike. A leading `#` on a channel name is ignored.
//!
//! # Not found
//!
//! A name that matches nothing is `Ok(None)`, not an error; the caller decides
//! how to report it. Remote API errors still propagate as `Err`.

use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::api::{ListPage, SlackApi, decode};
use crate::config::PaginationConfig;
use crate::error::{Result, Slack2CsvError};

/// What the caller asked to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A channel, private group or DM, by ID or name.
    Channel(String),
    /// The direct-message conversation with a user, by user ID or name.
    User(String),
}

impl Target {
    /// Returns a short label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Target::Channel(_) => "channel",
            Target::User(_) => "user",
        }
    }

    /// Returns the ID or name as given.
    pub fn value(&self) -> &str {
        match self {
            Target::Channel(v) | Target::User(v) => v,
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.value())
    }
}

/// Returns `true` if `s` looks like a conversation ID (`C…`, `G…`, `D…`).
///
/// ```rust
/// use slack2csv::resolve::is_conversation_id;
///
/// assert!(is_conversation_id("C8675309"));
/// assert!(is_conversation_id("D024BE91L"));
/// assert!(!is_conversation_id("general"));
/// assert!(!is_conversation_id("U0012345"));
/// ```
pub fn is_conversation_id(s: &str) -> bool {
    looks_like_id(s, &['C', 'G', 'D'])
}

/// Returns `true` if `s` looks like a user ID (`U…`, `W…`).
pub fn is_user_id(s: &str) -> bool {
    looks_like_id(s, &['U', 'W'])
}

/// Shortest ID accepted, prefix included.
const MIN_ID_LEN: usize = 8;

/// Prefix letter, then uppercase letters and digits with at least one digit.
fn looks_like_id(s: &str, prefixes: &[char]) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if prefixes.contains(&first) => {
            let rest = chars.as_str();
            s.len() >= MIN_ID_LEN
                && rest.chars().any(|c| c.is_ascii_digit())
                && rest
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Conversation categories accepted by `conversations.list`'s `types`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationType {
    PublicChannel,
    PrivateChannel,
    Mpim,
    Im,
}

impl ConversationType {
    /// Returns the API spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationType::PublicChannel => "public_channel",
            ConversationType::PrivateChannel => "private_channel",
            ConversationType::Mpim => "mpim",
            ConversationType::Im => "im",
        }
    }

    /// Joins types into the comma-separated form the API expects.
    pub fn join(types: &[ConversationType]) -> String {
        types
            .iter()
            .map(ConversationType::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl std::fmt::Display for ConversationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up conversation and user IDs by name.
pub struct Resolver<'a, A: SlackApi + ?Sized> {
    api: &'a A,
    types: Vec<ConversationType>,
    page_size: u32,
    request_delay: Duration,
}

impl<'a, A: SlackApi + ?Sized> Resolver<'a, A> {
    /// Creates a resolver that searches public and private channels.
    ///
    /// Page size and inter-request delay come from `config`.
    pub fn new(api: &'a A, config: &PaginationConfig) -> Self {
        Self {
            api,
            types: vec![
                ConversationType::PublicChannel,
                ConversationType::PrivateChannel,
            ],
            page_size: config.page_size.max(1),
            request_delay: config.request_delay,
        }
    }

    /// Restricts channel lookups to the given categories.
    #[must_use]
    pub fn with_types(mut self, types: Vec<ConversationType>) -> Self {
        if !types.is_empty() {
            self.types = types;
        }
        self
    }

    /// Maps a [`Target`] to the conversation ID whose history should be read.
    ///
    /// IDs pass through untouched. A user target resolves to the user's
    /// direct-message conversation.
    pub fn resolve(&self, target: &Target) -> Result<Option<String>> {
        match target {
            Target::Channel(id) if is_conversation_id(id) => Ok(Some(id.clone())),
            Target::Channel(name) => self.channel_id(name),
            Target::User(id) if is_conversation_id(id) => Ok(Some(id.clone())),
            Target::User(user) => {
                let user_id = if is_user_id(user) {
                    user.clone()
                } else {
                    match self.user_id(user)? {
                        Some(id) => id,
                        None => return Ok(None),
                    }
                };
                self.direct_message_id(&user_id)
            }
        }
    }

    /// Finds the ID of the conversation named `name`.
    pub fn channel_id(&self, name: &str) -> Result<Option<String>> {
        let name = name.trim_start_matches('#');
        let types = ConversationType::join(&self.types);
        let found = self.find_id("conversations.list", &[("types", types)], |entry| {
            str_field(entry, "name") == Some(name)
        })?;
        log_result("channel", name, found.as_deref());
        Ok(found)
    }

    /// Finds the ID of the user whose handle is `name`.
    pub fn user_id(&self, name: &str) -> Result<Option<String>> {
        let found = self.find_id("users.list", &[], |entry| str_field(entry, "name") == Some(name))?;
        log_result("user", name, found.as_deref());
        Ok(found)
    }

    /// Finds the direct-message conversation with `user_id`.
    pub fn direct_message_id(&self, user_id: &str) -> Result<Option<String>> {
        let types = ConversationType::Im.as_str().to_string();
        let found = self.find_id("conversations.list", &[("types", types)], |entry| {
            str_field(entry, "user") == Some(user_id)
        })?;
        log_result("direct message", user_id, found.as_deref());
        Ok(found)
    }

    /// Pages through `method` and returns the `id` of the first entry that
    /// satisfies `matches`.
    fn find_id(
        &self,
        method: &str,
        extra: &[(&'static str, String)],
        matches: impl Fn(&Value) -> bool,
    ) -> Result<Option<String>> {
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            if pages > 0 && !self.request_delay.is_zero() {
                thread::sleep(self.request_delay);
            }

            let mut params: Vec<(&str, String)> = vec![("limit", self.page_size.to_string())];
            params.extend(extra.iter().cloned());
            if let Some(cursor) = &cursor {
                params.push(("cursor", cursor.clone()));
            }

            let page: ListPage = decode(method, self.api.call(method, &params)?)?;
            pages += 1;

            let next = page.next_cursor().map(str::to_string);
            debug!(method, page = pages, entries = page.entries.len(), "listing page");

            if let Some(entry) = page.entries.iter().find(|entry| matches(entry)) {
                return match str_field(entry, "id") {
                    Some(id) => Ok(Some(id.to_string())),
                    None => Err(Slack2CsvError::malformed(method, "matching entry has no 'id'")),
                };
            }

            match next {
                Some(next) => cursor = Some(next),
                None => return Ok(None),
            }
        }
    }
}

fn str_field<'v>(entry: &'v Value, key: &str) -> Option<&'v str> {
    entry.get(key).and_then(Value::as_str)
}

fn log_result(kind: &str, name: &str, id: Option<&str>) {
    match id {
        Some(id) => info!(kind, name, id, "resolved"),
        None => info!(kind, name, "no match"),
    }
}
