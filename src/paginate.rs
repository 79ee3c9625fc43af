//! Lazy, paginated history fetch.
//!
//! [`Paginator`] turns a conversation's history into an
//! `Iterator<Item = Result<Message>>`. No request is made before the first
//! call to `next()`.
//!
//! # Ordering
//!
//! The sequence is always oldest-to-newest.
//!
//! Slack returns each history page newest-first, and the
//! `conversations.history` cursor walks from the newest page back to older
//! ones. In cursor mode the whole chain is therefore fetched before the first
//! message is yielded, then released sorted by timestamp. Offset mode pages
//! forward from a moving lower bound, so each page is yielded as soon as it
//! arrives, in ascending order.
//!
//! # Continuation
//!
//! | Mode | Method | Next page |
//! |------|--------|-----------|
//! | [`Pagination::Cursor`] | `conversations.history` | `cursor = response_metadata.next_cursor` |
//! | [`Pagination::Offset`] | `channels.history` | `oldest = newest ts of the page` while `has_more` |
//!
//! # Errors
//!
//! A page with `"ok": false` ends the sequence: the error is yielded once and
//! the iterator is fused afterwards. Nothing is retried. In cursor mode the
//! messages collected before the failure are yielded first, in ascending
//! order.
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! use slack2csv::api::SlackClient;
//! use slack2csv::config::PaginationConfig;
//! use slack2csv::paginate::Paginator;
//!
//! # fn main() -> slack2csv::Result<()> {
//! let client = SlackClient::new("xoxb-...")?;
//! let since = Utc::now() - Duration::days(1);
//!
//! for msg in Paginator::new(&client, "C8675309", since, &PaginationConfig::new()) {
//!     let msg = msg?;
//!     println!("{} {}", msg.ts, msg.text().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::Message;
use crate::api::{HistoryPage, SlackApi, decode};
use crate::config::{Pagination, PaginationConfig};
use crate::error::{Result, Slack2CsvError};
use crate::message::format_slack_ts;
use crate::progress::{Progress, ProgressCallback};

/// Totals for a fetch, reported once the sequence is fully drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// API pages received.
    pub pages: usize,
    /// Messages yielded.
    pub messages: usize,
    /// Oldest yielded timestamp.
    pub oldest: Option<DateTime<Utc>>,
    /// Newest yielded timestamp.
    pub newest: Option<DateTime<Utc>>,
}

impl FetchStats {
    fn record(&mut self, ts: DateTime<Utc>) {
        self.messages += 1;
        self.oldest = Some(self.oldest.map_or(ts, |o| o.min(ts)));
        self.newest = Some(self.newest.map_or(ts, |n| n.max(ts)));
    }
}

/// Where the next request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Continuation {
    /// No request issued yet.
    Start,
    /// Cursor from the previous page.
    Cursor(String),
    /// Exclusive lower bound from the previous page.
    After(DateTime<Utc>),
    /// The last page has been received (or a request failed).
    Done,
}

/// Lazy iterator over a conversation's messages at or after a lower bound.
///
/// See the [module documentation](self) for ordering and error semantics.
pub struct Paginator<'a, A: SlackApi + ?Sized> {
    api: &'a A,
    channel: String,
    oldest: DateTime<Utc>,
    mode: Pagination,
    page_size: u32,
    request_delay: Duration,
    progress: Option<ProgressCallback>,
    buffer: VecDeque<(DateTime<Utc>, Message)>,
    chain: Vec<(DateTime<Utc>, Message)>,
    newest_seen: Option<DateTime<Utc>>,
    pending_error: Option<Slack2CsvError>,
    next: Continuation,
    stats: FetchStats,
    failed: bool,
    reported: bool,
}

impl<'a, A: SlackApi + ?Sized> Paginator<'a, A> {
    /// Creates a paginator over `channel`'s history from `oldest` onwards.
    ///
    /// No request is made until the first call to `next()`.
    pub fn new(
        api: &'a A,
        channel: impl Into<String>,
        oldest: DateTime<Utc>,
        config: &PaginationConfig,
    ) -> Self {
        Self {
            api,
            channel: channel.into(),
            oldest,
            mode: config.mode,
            page_size: config.page_size.max(1),
            request_delay: config.request_delay,
            progress: None,
            buffer: VecDeque::new(),
            chain: Vec::new(),
            newest_seen: None,
            pending_error: None,
            next: Continuation::Start,
            stats: FetchStats::default(),
            failed: false,
            reported: false,
        }
    }

    /// Registers a callback invoked after every received page.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Returns the totals accumulated so far.
    pub fn stats(&self) -> FetchStats {
        self.stats
    }

    /// Returns `true` once the last page has been received or a request failed.
    pub fn is_exhausted(&self) -> bool {
        self.next == Continuation::Done
    }

    /// Builds the query for the next request.
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("channel", self.channel.clone()),
            (self.mode.page_size_param(), self.page_size.to_string()),
        ];

        match &self.next {
            Continuation::Start => {
                params.push(("oldest", format_slack_ts(&self.oldest)));
                params.push(("inclusive", "true".to_string()));
            }
            Continuation::Cursor(cursor) => {
                // Slack requires the first request's bounds to be repeated with the cursor.
                params.push(("oldest", format_slack_ts(&self.oldest)));
                params.push(("inclusive", "true".to_string()));
                params.push(("cursor", cursor.clone()));
            }
            Continuation::After(after) => {
                params.push(("oldest", format_slack_ts(after)));
            }
            Continuation::Done => {}
        }

        params
    }

    /// Requests one page and queues its messages.
    fn fetch_page(&mut self) -> Result<()> {
        if self.stats.pages > 0 && !self.request_delay.is_zero() {
            thread::sleep(self.request_delay);
        }

        let method = self.mode.history_method();
        let params = self.params();
        let value = self.api.call(method, &params)?;
        let page: HistoryPage = decode(method, value)?;

        self.stats.pages += 1;
        let has_more = page.has_more;
        let cursor = page.next_cursor().map(str::to_string);
        let received = page.messages.len();

        let ordered = order_page(method, page.messages)?;
        let newest_on_page = ordered.last().map(|(ts, _)| *ts);

        self.next = match self.mode {
            Pagination::Cursor => cursor.map_or(Continuation::Done, Continuation::Cursor),
            Pagination::Offset => match (has_more, newest_on_page) {
                (true, Some(newest)) => Continuation::After(newest),
                (true, None) => {
                    warn!(method, "has_more set on an empty page; stopping");
                    Continuation::Done
                }
                (false, _) => Continuation::Done,
            },
        };

        let before_bound = ordered.iter().filter(|(ts, _)| *ts < self.oldest).count();
        if before_bound > 0 {
            debug!(before_bound, "dropping messages older than the lower bound");
        }

        let oldest = self.oldest;
        let kept = ordered
            .into_iter()
            .filter(|(ts, _)| *ts >= oldest)
            .map(|(ts, msg)| (ts, msg.normalize()));
        match self.mode {
            Pagination::Cursor => self.chain.extend(kept),
            Pagination::Offset => self.buffer.extend(kept),
        }
        if let Some(newest) = newest_on_page.filter(|ts| *ts >= oldest) {
            self.newest_seen = Some(self.newest_seen.map_or(newest, |n| n.max(newest)));
        }

        debug!(
            method,
            page = self.stats.pages,
            received,
            more = self.next != Continuation::Done,
            "page received"
        );

        if let Some(callback) = &self.progress {
            let pending = self.buffer.len() + self.chain.len();
            callback(
                Progress::new(self.stats.pages, self.stats.messages + pending)
                    .with_newest(self.newest_seen),
            );
        }

        if self.next == Continuation::Done {
            self.release_chain();
        }

        Ok(())
    }

    /// Moves the collected cursor chain into the output buffer, oldest first.
    fn release_chain(&mut self) {
        let mut chain = std::mem::take(&mut self.chain);
        if chain.is_empty() {
            return;
        }
        chain.sort_by_key(|(ts, _)| *ts);
        debug!(messages = chain.len(), "cursor chain released");
        self.buffer.extend(chain);
    }

    fn report(&mut self) {
        if self.reported || self.failed {
            return;
        }
        self.reported = true;

        let fmt = |ts: Option<DateTime<Utc>>| {
            ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        info!(
            channel = %self.channel,
            pages = self.stats.pages,
            messages = self.stats.messages,
            oldest = %fmt(self.stats.oldest),
            newest = %fmt(self.stats.newest),
            "history drained"
        );
    }
}

impl<A: SlackApi + ?Sized> Iterator for Paginator<'_, A> {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((ts, msg)) = self.buffer.pop_front() {
                self.stats.record(ts);
                return Some(Ok(msg));
            }

            if let Some(err) = self.pending_error.take() {
                return Some(Err(err));
            }

            if self.next == Continuation::Done {
                self.report();
                return None;
            }

            if let Err(err) = self.fetch_page() {
                self.next = Continuation::Done;
                self.failed = true;
                self.release_chain();
                self.pending_error = Some(err);
            }
        }
    }
}

impl<A: SlackApi + ?Sized> std::iter::FusedIterator for Paginator<'_, A> {}

/// Parses every timestamp on a page and returns the page oldest-first.
///
/// Newest-first pages are reversed; anything else out of order is stably
/// sorted. A message whose `ts` does not parse makes the page malformed.
fn order_page(method: &str, messages: Vec<Message>) -> Result<Vec<(DateTime<Utc>, Message)>> {
    let mut page = messages
        .into_iter()
        .map(|msg| match msg.timestamp() {
            Some(ts) => Ok((ts, msg)),
            None => Err(Slack2CsvError::malformed(
                method,
                format!("unparseable message timestamp '{}'", msg.ts),
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    if let (Some((first, _)), Some((last, _))) = (page.first(), page.last()) {
        if first > last {
            page.reverse();
        }
    }
    if !page.is_sorted_by_key(|(ts, _)| *ts) {
        page.sort_by_key(|(ts, _)| *ts);
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{Value, json};

    use super::*;
    use crate::api::mock::ScriptedApi;
    use crate::message::parse_slack_ts;

    fn config(mode: Pagination) -> PaginationConfig {
        PaginationConfig::new()
            .with_mode(mode)
            .with_request_delay(Duration::ZERO)
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::from_timestamp(0, 0).unwrap()
    }

    fn msg(ts: &str, text: &str) -> Value {
        json!({"type": "message", "user": "U0012345", "text": text, "ts": ts})
    }

    fn cursor_page(messages: Vec<Value>, cursor: Option<&str>) -> Value {
        match cursor {
            Some(c) => json!({"ok": true, "messages": messages, "response_metadata": {"next_cursor": c}}),
            None => json!({"ok": true, "messages": messages, "response_metadata": {"next_cursor": ""}}),
        }
    }

    fn texts(messages: &[Message]) -> Vec<&str> {
        messages.iter().filter_map(Message::text).collect()
    }

    #[test]
    fn test_single_page_has_more_false() {
        let api = ScriptedApi::new([json!({
            "ok": true,
            "has_more": false,
            "messages": [msg("1513173325.000024", "Hey!")]
        })]);

        let messages: Vec<Message> = Paginator::new(&api, "C1", epoch(), &config(Pagination::Offset))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(texts(&messages), ["Hey!"]);
        assert_eq!(api.calls().len(), 1);
    }

    #[test]
    fn test_three_cursor_pages_three_requests() {
        let api = ScriptedApi::new([
            cursor_page(vec![msg("1.000001", "one")], Some("foo")),
            cursor_page(vec![msg("2.000001", "two")], Some("bar")),
            json!({"ok": true, "messages": [msg("3.000001", "three")]}),
        ]);

        let messages: Vec<Message> = Paginator::new(&api, "C1", epoch(), &config(Pagination::Cursor))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(texts(&messages), ["one", "two", "three"]);

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].method, "conversations.history");
        assert_eq!(calls[0].param("cursor"), None);
        assert_eq!(calls[1].param("cursor"), Some("foo"));
        assert_eq!(calls[2].param("cursor"), Some("bar"));
        assert!(calls.iter().all(|c| c.param("channel") == Some("C1")));
        assert!(calls.iter().all(|c| c.param("limit") == Some("100")));
    }

    #[test]
    fn test_remote_error_aborts_and_fuses() {
        let api = ScriptedApi::new([
            cursor_page(vec![msg("1.0", "ok")], Some("foo")),
            json!({"ok": false, "error": "boom"}),
            cursor_page(vec![msg("2.0", "never")], None),
        ]);

        let mut pager = Paginator::new(&api, "C1", epoch(), &config(Pagination::Cursor));
        assert_eq!(pager.next().unwrap().unwrap().text(), Some("ok"));

        let err = pager.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert!(err.is_api());

        assert!(pager.next().is_none());
        assert!(pager.next().is_none());
        assert!(pager.is_exhausted());
        assert_eq!(api.calls().len(), 2);
    }

    #[test]
    fn test_error_on_first_page() {
        let api = ScriptedApi::new([json!({
            "ok": false,
            "error": "I'm an error",
            "has_more": false,
            "messages": [msg("1513173325.000024", "Hey!")]
        })]);

        let result: Result<Vec<Message>> =
            Paginator::new(&api, "C1", epoch(), &config(Pagination::Offset)).collect();
        let err = result.unwrap_err();
        assert_eq!(err.remote_message(), Some("I'm an error"));
    }

    #[test]
    fn test_newest_first_page_is_reversed() {
        let api = ScriptedApi::new([cursor_page(
            vec![msg("3.0", "c"), msg("2.0", "b"), msg("1.0", "a")],
            None,
        )]);

        let messages: Vec<Message> = Paginator::new(&api, "C1", epoch(), &config(Pagination::Cursor))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(texts(&messages), ["a", "b", "c"]);
    }

    #[test]
    fn test_offset_advances_lower_bound_to_newest_of_page() {
        let api = ScriptedApi::new([
            json!({"ok": true, "has_more": true, "messages": [msg("20.000002", "d"), msg("10.000001", "c")]}),
            json!({"ok": true, "has_more": false, "messages": [msg("30.0", "e")]}),
        ]);

        let oldest = DateTime::from_timestamp(5, 0).unwrap();
        let messages: Vec<Message> = Paginator::new(&api, "C1", oldest, &config(Pagination::Offset))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(texts(&messages), ["c", "d", "e"]);

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "channels.history");
        assert_eq!(calls[0].param("oldest"), Some("5.000000"));
        assert_eq!(calls[0].param("inclusive"), Some("true"));
        assert_eq!(calls[0].param("count"), Some("100"));
        assert_eq!(calls[1].param("oldest"), Some("20.000002"));
        assert_eq!(calls[1].param("inclusive"), None);
    }

    #[test]
    fn test_offset_empty_page_with_has_more_stops() {
        let api = ScriptedApi::new([json!({"ok": true, "has_more": true, "messages": []})]);

        let messages: Vec<Message> = Paginator::new(&api, "C1", epoch(), &config(Pagination::Offset))
            .collect::<Result<_>>()
            .unwrap();
        assert!(messages.is_empty());
        assert_eq!(api.calls().len(), 1);
    }

    #[test]
    fn test_messages_before_bound_are_dropped() {
        let api = ScriptedApi::new([cursor_page(
            vec![msg("200.0", "new"), msg("99.999999", "old"), msg("100.0", "edge")],
            None,
        )]);

        let oldest = parse_slack_ts("100.0").unwrap();
        let messages: Vec<Message> = Paginator::new(&api, "C1", oldest, &config(Pagination::Cursor))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(texts(&messages), ["edge", "new"]);
    }

    #[test]
    fn test_unparseable_ts_is_malformed() {
        let api = ScriptedApi::new([cursor_page(vec![msg("yesterday", "x")], None)]);

        let err = Paginator::new(&api, "C1", epoch(), &config(Pagination::Cursor))
            .collect::<Result<Vec<_>>>()
            .unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_missing_messages_array_is_malformed() {
        let api = ScriptedApi::new([json!({"ok": true, "has_more": false})]);

        let err = Paginator::new(&api, "C1", epoch(), &config(Pagination::Offset))
            .collect::<Result<Vec<_>>>()
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_missing_type_is_normalized() {
        let api = ScriptedApi::new([cursor_page(
            vec![json!({"user": "U1", "text": "hi", "ts": "1.0"})],
            None,
        )]);

        let messages: Vec<Message> = Paginator::new(&api, "C1", epoch(), &config(Pagination::Cursor))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(messages[0].kind.as_deref(), Some("message"));
    }

    #[test]
    fn test_offset_is_lazy() {
        let api = ScriptedApi::new([
            json!({"ok": true, "has_more": true, "messages": [msg("2.0", "b"), msg("1.0", "a")]}),
            json!({"ok": true, "has_more": false, "messages": [msg("3.0", "c")]}),
        ]);

        let mut pager = Paginator::new(&api, "C1", epoch(), &config(Pagination::Offset));
        assert!(api.calls().is_empty());

        pager.next();
        pager.next();
        assert_eq!(api.calls().len(), 1);

        pager.next();
        assert_eq!(api.calls().len(), 2);
    }

    #[test]
    fn test_cursor_fetches_chain_on_first_next() {
        let api = ScriptedApi::new([
            cursor_page(vec![msg("3.0", "c")], Some("foo")),
            cursor_page(vec![msg("2.0", "b"), msg("1.0", "a")], None),
        ]);

        let mut pager = Paginator::new(&api, "C1", epoch(), &config(Pagination::Cursor));
        assert!(api.calls().is_empty());

        assert_eq!(pager.next().unwrap().unwrap().text(), Some("a"));
        assert_eq!(api.calls().len(), 2);
        assert!(pager.is_exhausted());
    }

    #[test]
    fn test_cursor_chain_walking_backwards_is_ascending() {
        let api = ScriptedApi::new([
            cursor_page(vec![msg("30.0", "d"), msg("20.0", "c")], Some("foo")),
            cursor_page(vec![msg("15.0", "b"), msg("12.0", "a2")], Some("bar")),
            cursor_page(vec![msg("10.0", "a")], None),
        ]);

        let messages: Vec<Message> = Paginator::new(&api, "C1", epoch(), &config(Pagination::Cursor))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(texts(&messages), ["a", "a2", "b", "c", "d"]);
        assert_eq!(api.calls().len(), 3);
    }

    #[test]
    fn test_cursor_error_yields_collected_messages_first() {
        let api = ScriptedApi::new([
            cursor_page(vec![msg("30.0", "newer"), msg("20.0", "older")], Some("foo")),
            json!({"ok": false, "error": "ratelimited"}),
        ]);

        let mut pager = Paginator::new(&api, "C1", epoch(), &config(Pagination::Cursor));
        assert_eq!(pager.next().unwrap().unwrap().text(), Some("older"));
        assert_eq!(pager.next().unwrap().unwrap().text(), Some("newer"));
        assert_eq!(
            pager.next().unwrap().unwrap_err().remote_message(),
            Some("ratelimited")
        );
        assert!(pager.next().is_none());
    }

    #[test]
    fn test_stats_after_drain() {
        let api = ScriptedApi::new([
            cursor_page(vec![msg("20.0", "b"), msg("10.0", "a")], Some("foo")),
            cursor_page(vec![msg("30.0", "c")], None),
        ]);

        let mut pager = Paginator::new(&api, "C1", epoch(), &config(Pagination::Cursor));
        let count = pager.by_ref().count();
        assert_eq!(count, 3);

        let stats = pager.stats();
        assert_eq!(stats.pages, 2);
        assert_eq!(stats.messages, 3);
        assert_eq!(stats.oldest, parse_slack_ts("10.0"));
        assert_eq!(stats.newest, parse_slack_ts("30.0"));
    }

    #[test]
    fn test_progress_callback_per_page() {
        let api = ScriptedApi::new([
            cursor_page(vec![msg("1.0", "a"), msg("2.0", "b")], Some("foo")),
            cursor_page(vec![msg("3.0", "c")], None),
        ]);

        let pages = Arc::new(AtomicUsize::new(0));
        let fetched = Arc::new(AtomicUsize::new(0));
        let (p, f) = (pages.clone(), fetched.clone());

        let pager = Paginator::new(&api, "C1", epoch(), &config(Pagination::Cursor)).with_progress(
            Arc::new(move |progress: Progress| {
                p.store(progress.pages_fetched, Ordering::SeqCst);
                f.store(progress.messages_fetched, Ordering::SeqCst);
            }),
        );
        assert_eq!(pager.count(), 3);

        assert_eq!(pages.load(Ordering::SeqCst), 2);
        assert_eq!(fetched.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_delay_between_pages() {
        let api = ScriptedApi::new([
            cursor_page(vec![msg("1.0", "a")], Some("foo")),
            cursor_page(vec![msg("2.0", "b")], None),
        ]);

        let delay = Duration::from_millis(50);
        let config = config(Pagination::Cursor).with_request_delay(delay);

        let start = std::time::Instant::now();
        assert_eq!(Paginator::new(&api, "C1", epoch(), &config).count(), 2);
        assert!(start.elapsed() >= delay);
    }

    #[test]
    fn test_order_page_sorts_mixed_order() {
        let page = vec![
            Message::new("2.0"),
            Message::new("1.0"),
            Message::new("3.0"),
        ];
        let ordered = order_page("m", page).unwrap();
        let ts: Vec<&str> = ordered.iter().map(|(_, m)| m.ts.as_str()).collect();
        assert_eq!(ts, ["1.0", "2.0", "3.0"]);
    }

    /// Builds a newest-first cursor chain over `ts` split at `cuts`.
    fn backward_chain(ts: &[u32], cuts: &[usize]) -> Vec<Value> {
        let mut newest_first: Vec<u32> = ts.to_vec();
        newest_first.sort_unstable_by(|a, b| b.cmp(a));

        let mut bounds: Vec<usize> = cuts.iter().map(|c| c % (newest_first.len() + 1)).collect();
        bounds.push(0);
        bounds.push(newest_first.len());
        bounds.sort_unstable();
        bounds.dedup();

        let pages: Vec<&[u32]> = bounds.windows(2).map(|w| &newest_first[w[0]..w[1]]).collect();
        let last = pages.len().saturating_sub(1);
        pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let messages = page.iter().map(|t| msg(&format!("{t}.000000"), "x")).collect();
                let cursor = format!("page{}", i + 1);
                cursor_page(messages, (i < last).then_some(cursor.as_str()))
            })
            .collect()
    }

    proptest::proptest! {
        #[test]
        fn prop_cursor_chain_is_non_decreasing(
            ts in proptest::collection::vec(1u32..1_000_000, 1..40),
            cuts in proptest::collection::vec(0usize..64, 0..6),
        ) {
            let pages = backward_chain(&ts, &cuts);
            let page_count = pages.len();
            let api = ScriptedApi::new(pages);

            let messages: Vec<Message> = Paginator::new(&api, "C1", epoch(), &config(Pagination::Cursor))
                .collect::<Result<_>>()
                .unwrap();

            proptest::prop_assert_eq!(messages.len(), ts.len());
            proptest::prop_assert_eq!(api.calls().len(), page_count);
            let stamps: Vec<_> = messages.iter().map(Message::timestamp).collect();
            proptest::prop_assert!(stamps.is_sorted());
        }
    }
}
