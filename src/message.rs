//! Slack message record.
//!
//! This module provides [`Message`], the record produced by the paginator and
//! consumed by the exporter. Slack messages are loosely typed: user messages,
//! bot messages, joins and file shares all carry different fields. `Message`
//! exposes the handful of fields the pipeline reasons about and keeps every
//! other field in an ordered bag so it can be passed straight through to CSV.
//!
//! # Overview
//!
//! - **Required**: `ts` (`seconds.microseconds`, assigned by Slack)
//! - **Known optional**: `text`, `user`, `type`, `subtype`
//! - **Passthrough**: anything else (`bot_id`, `thread_ts`, `reactions`, ...)
//!
//! # Examples
//!
//! ```
//! use slack2csv::Message;
//!
//! let json = r#"{"type":"message","user":"U0012345","text":"Hey!","ts":"1513173325.000024","team":"T1"}"#;
//! let msg: Message = serde_json::from_str(json)?;
//!
//! assert_eq!(msg.author(), Some("U0012345"));
//! assert_eq!(msg.field("team").as_deref(), Some("T1"));
//! assert_eq!(msg.field_names(), ["team", "text", "ts", "type", "user"]);
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Subtype Slack assigns to messages posted by bots and integrations.
pub const BOT_MESSAGE_SUBTYPE: &str = "bot_message";

/// A single message from a Slack conversation history.
///
/// # Fields
///
/// | Field | JSON key | Description |
/// |-------|----------|-------------|
/// | `ts` | `ts` | Slack timestamp, unique within the conversation |
/// | `text` | `text` | Message body |
/// | `user` | `user` | Author's user ID; absent on most bot messages |
/// | `kind` | `type` | Event type, `"message"` for history entries |
/// | `subtype` | `subtype` | Discriminator such as `bot_message` or `channel_join` |
/// | `extra` | *(any other)* | Remaining fields, kept sorted by name |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Slack timestamp, e.g. `"1513173325.000024"`.
    pub ts: String,

    /// Message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Author's user ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Event type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Message subtype.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    /// Every other field Slack sent.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Message {
    /// Creates a message with only a timestamp.
    ///
    /// # Example
    ///
    /// ```rust
    /// use slack2csv::Message;
    ///
    /// let msg = Message::new("1513173325.000024")
    ///     .with_user("U0012345")
    ///     .with_text("Hey!");
    /// assert_eq!(msg.text(), Some("Hey!"));
    /// ```
    pub fn new(ts: impl Into<String>) -> Self {
        Self {
            ts: ts.into(),
            text: None,
            user: None,
            kind: None,
            subtype: None,
            extra: BTreeMap::new(),
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Sets the message body.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the author's user ID.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the event type.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets the subtype.
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Adds a passthrough field.
    ///
    /// Known fields (`ts`, `text`, `user`, `type`, `subtype`) have their own
    /// builders and must not be set here.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the message body, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the author's user ID, if any.
    pub fn author(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Parses `ts` into a UTC datetime.
    ///
    /// Returns `None` if `ts` is not of the form `seconds[.fraction]`.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_slack_ts(&self.ts)
    }

    /// Returns `true` if the message was posted by a bot or integration.
    pub fn is_bot_message(&self) -> bool {
        self.subtype.as_deref() == Some(BOT_MESSAGE_SUBTYPE)
    }

    /// Fills in the `type` discriminator when Slack left it out.
    ///
    /// History endpoints only ever return `"message"` events, so a missing
    /// type is normalized to that.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.kind.is_none() {
            self.kind = Some("message".to_string());
        }
        self
    }

    /// Returns the value of a field as CSV cell text, or `None` if the
    /// message does not carry it.
    ///
    /// Strings are returned verbatim, numbers and booleans in their JSON
    /// spelling, `null` as the empty string, and nested objects/arrays as
    /// compact JSON.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "ts" => Some(self.ts.clone()),
            "text" => self.text.clone(),
            "user" => self.user.clone(),
            "type" => self.kind.clone(),
            "subtype" => self.subtype.clone(),
            _ => self.extra.get(name).map(value_to_cell),
        }
    }

    /// Returns the names of all fields present on this message, sorted.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.extra.keys().cloned().collect();
        names.push("ts".to_string());
        if self.text.is_some() {
            names.push("text".to_string());
        }
        if self.user.is_some() {
            names.push("user".to_string());
        }
        if self.kind.is_some() {
            names.push("type".to_string());
        }
        if self.subtype.is_some() {
            names.push("subtype".to_string());
        }
        names.sort();
        names.dedup();
        names
    }
}

/// Renders a JSON value as a CSV cell.
fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

// =========================================================================
// Timestamp helpers
// =========================================================================

/// Parses a Slack timestamp (`"1513173325.000024"`) into a UTC datetime.
///
/// The fractional part is optional and may have up to nine digits.
///
/// # Example
///
/// ```rust
/// use slack2csv::message::parse_slack_ts;
///
/// let dt = parse_slack_ts("1513173325.000024").unwrap();
/// assert_eq!(dt.timestamp(), 1513173325);
/// assert_eq!(dt.timestamp_subsec_micros(), 24);
///
/// assert!(parse_slack_ts("yesterday").is_none());
/// ```
pub fn parse_slack_ts(ts: &str) -> Option<DateTime<Utc>> {
    let (secs, frac) = ts.split_once('.').unwrap_or((ts, ""));

    if secs.is_empty() || !secs.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let secs: i64 = secs.parse().ok()?;
    let nanos: u32 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<9}").parse().ok()?
    };

    DateTime::from_timestamp(secs, nanos)
}

/// Formats a datetime as a Slack timestamp with microsecond precision.
///
/// # Example
///
/// ```rust
/// use slack2csv::message::{format_slack_ts, parse_slack_ts};
///
/// let dt = parse_slack_ts("1513173325.000024").unwrap();
/// assert_eq!(format_slack_ts(&dt), "1513173325.000024");
/// ```
pub fn format_slack_ts(dt: &DateTime<Utc>) -> String {
    format!("{}.{:06}", dt.timestamp(), dt.timestamp_subsec_micros())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_user_message() {
        let msg: Message = serde_json::from_value(json!({
            "type": "message",
            "user": "U0012345",
            "text": "Hey!",
            "ts": "1513173325.000024"
        }))
        .unwrap();

        assert_eq!(msg.author(), Some("U0012345"));
        assert_eq!(msg.text(), Some("Hey!"));
        assert_eq!(msg.kind.as_deref(), Some("message"));
        assert!(msg.extra.is_empty());
        assert!(!msg.is_bot_message());
    }

    #[test]
    fn test_deserialize_bot_message_keeps_extra_fields() {
        let msg: Message = serde_json::from_value(json!({
            "type": "message",
            "subtype": "bot_message",
            "bot_id": "B123",
            "username": "deploybot",
            "text": "Deployed",
            "ts": "1513173330.000100"
        }))
        .unwrap();

        assert!(msg.is_bot_message());
        assert_eq!(msg.author(), None);
        assert_eq!(msg.field("bot_id").as_deref(), Some("B123"));
        assert_eq!(msg.field("username").as_deref(), Some("deploybot"));
    }

    #[test]
    fn test_missing_ts_is_rejected() {
        let result = serde_json::from_value::<Message>(json!({"text": "no ts"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_fills_type_only_when_missing() {
        let msg = Message::new("1.0").normalize();
        assert_eq!(msg.kind.as_deref(), Some("message"));

        let msg = Message::new("1.0").with_kind("reminder").normalize();
        assert_eq!(msg.kind.as_deref(), Some("reminder"));
    }

    #[test]
    fn test_field_rendering() {
        let msg = Message::new("1513173325.000024")
            .with_field("reply_count", 3)
            .with_field("is_starred", true)
            .with_field("edited", Value::Null)
            .with_field("reactions", json!([{"name": "tada", "count": 2}]));

        assert_eq!(msg.field("reply_count").as_deref(), Some("3"));
        assert_eq!(msg.field("is_starred").as_deref(), Some("true"));
        assert_eq!(msg.field("edited").as_deref(), Some(""));
        assert_eq!(
            msg.field("reactions").as_deref(),
            Some(r#"[{"count":2,"name":"tada"}]"#)
        );
        assert_eq!(msg.field("text"), None);
        assert_eq!(msg.field("nope"), None);
    }

    #[test]
    fn test_field_names_sorted() {
        let msg = Message::new("1.0")
            .with_user("U1")
            .with_text("hi")
            .with_subtype("thread_broadcast")
            .with_field("client_msg_id", "abc")
            .with_field("blocks", json!([]));

        assert_eq!(
            msg.field_names(),
            ["blocks", "client_msg_id", "subtype", "text", "ts", "user"]
        );
    }

    #[test]
    fn test_serialization_round_trip_preserves_extra() {
        let msg = Message::new("1513173325.000024")
            .with_user("U1")
            .with_field("team", "T1");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("subtype"));
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn test_parse_slack_ts() {
        let dt = parse_slack_ts("1513173325.000024").unwrap();
        assert_eq!(dt.timestamp(), 1_513_173_325);
        assert_eq!(dt.timestamp_subsec_micros(), 24);

        let whole = parse_slack_ts("1513173325").unwrap();
        assert_eq!(whole.timestamp_subsec_nanos(), 0);

        let short = parse_slack_ts("1513173325.5").unwrap();
        assert_eq!(short.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_parse_slack_ts_rejects_garbage() {
        assert!(parse_slack_ts("").is_none());
        assert!(parse_slack_ts(".123").is_none());
        assert!(parse_slack_ts("-1.0").is_none());
        assert!(parse_slack_ts("12a4.000001").is_none());
        assert!(parse_slack_ts("1.0000000001").is_none());
        assert!(parse_slack_ts("1.2.3").is_none());
    }

    #[test]
    fn test_format_slack_ts() {
        let dt = DateTime::from_timestamp(1_700_000_000, 123_456_000).unwrap();
        assert_eq!(format_slack_ts(&dt), "1700000000.123456");
    }

    #[test]
    fn test_timestamp_ordering_matches_numeric_ordering() {
        let a = Message::new("999.999999").timestamp().unwrap();
        let b = Message::new("1000.000001").timestamp().unwrap();
        assert!(a < b);
    }
}
