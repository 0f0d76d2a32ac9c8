// crates/core/src/calendar.rs
//! Viewing-activity calendar aggregation.
//!
//! Raw watch sessions in, one dense month of days out. The pass is
//! accumulate-then-densify: group rows by (day, media identity) in a
//! single sweep, then walk the month's full day list so that quiet days
//! still get an entry with an empty item list.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::month::MonthSpan;
use crate::store::ActivityStore;

// ============================================================================
// Types
// ============================================================================

/// The closed set of media kinds a watch session can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
}

impl MediaType {
    /// Parse from the stored column value.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(MediaType::Movie),
            "series" => Some(MediaType::Series),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
        }
    }
}

/// A raw watch-session row, as returned by the activity store.
///
/// `title` and `poster_path` are opaque display strings captured when the
/// session was recorded; the aggregator passes them through unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchSession {
    pub user_id: String,
    /// When the title was watched. Rows without a timestamp cannot be
    /// placed on any calendar day and are skipped during grouping.
    pub watched_at: Option<DateTime<Utc>>,
    pub media_id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_path: Option<String>,
}

impl WatchSession {
    /// The UTC civil date this session belongs to, if it has a timestamp.
    pub fn watched_date(&self) -> Option<NaiveDate> {
        self.watched_at.map(|t| t.date_naive())
    }
}

/// One watched title within a day: sessions sharing the same media
/// identity on the same date fold into a single item with a count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchedItem {
    pub media_id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_path: Option<String>,
    pub session_count: i64,
}

/// One calendar day. Present for every date in the month, even when
/// nothing was watched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub watched_items: Vec<WatchedItem>,
}

/// A full month of days, ascending, one entry per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

/// Grouping key: the same title watched on the same day is one item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    date: NaiveDate,
    media_id: i64,
    media_type: MediaType,
    title: String,
    poster_path: Option<String>,
}

// ============================================================================
// Aggregation
// ============================================================================

/// Group raw sessions and merge them into the month's full day list.
///
/// Rows outside the span or without a timestamp contribute nothing.
/// Item order within a day is first-seen order over the input, so an
/// unchanged row set always produces an identical result.
pub fn build_month(span: &MonthSpan, rows: &[WatchSession]) -> CalendarMonth {
    let mut items_by_day: HashMap<NaiveDate, Vec<WatchedItem>> = HashMap::new();
    let mut slots: HashMap<GroupKey, usize> = HashMap::new();

    for row in rows {
        let Some(date) = row.watched_date() else {
            tracing::debug!(
                media_id = row.media_id,
                title = %row.title,
                "skipping watch session without a timestamp"
            );
            continue;
        };
        if date < span.first() || date > span.last() {
            continue;
        }

        let key = GroupKey {
            date,
            media_id: row.media_id,
            media_type: row.media_type,
            title: row.title.clone(),
            poster_path: row.poster_path.clone(),
        };
        let items = items_by_day.entry(date).or_default();
        match slots.get(&key) {
            Some(&slot) => items[slot].session_count += 1,
            None => {
                slots.insert(key, items.len());
                items.push(WatchedItem {
                    media_id: row.media_id,
                    media_type: row.media_type,
                    title: row.title.clone(),
                    poster_path: row.poster_path.clone(),
                    session_count: 1,
                });
            }
        }
    }

    let days = span
        .days()
        .into_iter()
        .map(|date| CalendarDay {
            date,
            watched_items: items_by_day.remove(&date).unwrap_or_default(),
        })
        .collect();

    CalendarMonth {
        year: span.year(),
        month: span.month(),
        days,
    }
}

/// Fetch the user's sessions for the month and build the dense calendar.
///
/// All-or-nothing: a store failure surfaces as an error, never as a
/// partially populated month.
pub async fn aggregate(
    store: &dyn ActivityStore,
    user_id: &str,
    span: &MonthSpan,
) -> Result<CalendarMonth, CalendarError> {
    let rows = store
        .fetch_sessions(user_id, span.first(), span.last())
        .await?;
    Ok(build_month(span, &rows))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NoStore, StoreError};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    fn session(ts: &str, media_id: i64, title: &str) -> WatchSession {
        WatchSession {
            user_id: "user-1".to_string(),
            watched_at: Some(ts.parse().expect("valid RFC 3339 timestamp")),
            media_id,
            media_type: MediaType::Movie,
            title: title.to_string(),
            poster_path: Some(format!("/{}.jpg", media_id)),
        }
    }

    fn march_2024() -> MonthSpan {
        MonthSpan::resolve(2024, 3).unwrap()
    }

    #[test]
    fn test_empty_rows_produce_dense_empty_month() {
        let month = build_month(&march_2024(), &[]);
        assert_eq!(month.year, 2024);
        assert_eq!(month.month, 3);
        assert_eq!(month.days.len(), 31);
        assert!(month.days.iter().all(|d| d.watched_items.is_empty()));
        assert_eq!(
            month.days[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(
            month.days[30].date,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
    }

    #[test]
    fn test_duplicate_rows_fold_into_one_item() {
        // Two identical rows on the same day: one group, count 2,
        // every other day empty.
        let rows = vec![
            session("2024-03-05T10:00:00Z", 10, "A"),
            session("2024-03-05T20:30:00Z", 10, "A"),
        ];
        let month = build_month(&march_2024(), &rows);

        let day = &month.days[4];
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(day.watched_items.len(), 1);
        assert_eq!(day.watched_items[0].session_count, 2);
        assert_eq!(day.watched_items[0].title, "A");

        let quiet = month
            .days
            .iter()
            .filter(|d| d.watched_items.is_empty())
            .count();
        assert_eq!(quiet, 30);
    }

    #[test]
    fn test_splitting_a_row_increments_count_not_groups() {
        let mut rows = vec![session("2024-03-05T10:00:00Z", 10, "A")];
        let before = build_month(&march_2024(), &rows);
        rows.push(session("2024-03-05T11:00:00Z", 10, "A"));
        let after = build_month(&march_2024(), &rows);

        assert_eq!(before.days[4].watched_items.len(), 1);
        assert_eq!(after.days[4].watched_items.len(), 1);
        assert_eq!(
            after.days[4].watched_items[0].session_count,
            before.days[4].watched_items[0].session_count + 1
        );
    }

    #[test]
    fn test_distinct_titles_stay_separate_groups() {
        let rows = vec![
            session("2024-03-05T10:00:00Z", 10, "A"),
            session("2024-03-05T12:00:00Z", 11, "B"),
            session("2024-03-05T14:00:00Z", 10, "A"),
        ];
        let month = build_month(&march_2024(), &rows);
        let day = &month.days[4];
        assert_eq!(day.watched_items.len(), 2);
        // First-seen order
        assert_eq!(day.watched_items[0].title, "A");
        assert_eq!(day.watched_items[0].session_count, 2);
        assert_eq!(day.watched_items[1].title, "B");
        assert_eq!(day.watched_items[1].session_count, 1);
    }

    #[test]
    fn test_same_media_id_different_type_is_different_group() {
        let movie = session("2024-03-05T10:00:00Z", 10, "A");
        let mut show = session("2024-03-05T11:00:00Z", 10, "A");
        show.media_type = MediaType::Series;
        let month = build_month(&march_2024(), &[movie, show]);
        assert_eq!(month.days[4].watched_items.len(), 2);
    }

    #[test]
    fn test_utc_day_boundary() {
        // 23:59 UTC and 00:30 UTC the next day land on different days.
        let rows = vec![
            session("2024-03-05T23:59:00Z", 10, "A"),
            session("2024-03-06T00:30:00Z", 10, "A"),
        ];
        let month = build_month(&march_2024(), &rows);
        assert_eq!(month.days[4].watched_items[0].session_count, 1);
        assert_eq!(month.days[5].watched_items[0].session_count, 1);
    }

    #[test]
    fn test_rows_without_timestamp_are_skipped() {
        let mut no_ts = session("2024-03-05T10:00:00Z", 10, "A");
        no_ts.watched_at = None;
        let month = build_month(&march_2024(), &[no_ts]);
        assert!(month.days.iter().all(|d| d.watched_items.is_empty()));
    }

    #[test]
    fn test_rows_outside_span_are_ignored() {
        let rows = vec![
            session("2024-02-29T10:00:00Z", 10, "A"),
            session("2024-04-01T10:00:00Z", 10, "A"),
        ];
        let month = build_month(&march_2024(), &rows);
        assert!(month.days.iter().all(|d| d.watched_items.is_empty()));
        assert_eq!(month.days.len(), 31);
    }

    #[test]
    fn test_build_month_is_idempotent() {
        let rows = vec![
            session("2024-03-05T10:00:00Z", 10, "A"),
            session("2024-03-12T10:00:00Z", 11, "B"),
            session("2024-03-05T22:00:00Z", 10, "A"),
        ];
        let first = build_month(&march_2024(), &rows);
        let second = build_month(&march_2024(), &rows);
        assert_eq!(first, second);
    }

    #[test]
    fn test_leap_february_is_dense() {
        let span = MonthSpan::resolve(2024, 2).unwrap();
        let month = build_month(&span, &[]);
        assert_eq!(month.days.len(), 29);
        let span = MonthSpan::resolve(2023, 2).unwrap();
        assert_eq!(build_month(&span, &[]).days.len(), 28);
    }

    #[test]
    fn test_day_serialization_shape() {
        let month = build_month(
            &march_2024(),
            &[session("2024-03-05T10:00:00Z", 10, "A")],
        );
        let json = serde_json::to_value(&month).unwrap();
        assert_eq!(json["year"], 2024);
        assert_eq!(json["month"], 3);
        assert_eq!(json["days"][4]["date"], "2024-03-05");
        let item = &json["days"][4]["watchedItems"][0];
        assert_eq!(item["media_id"], 10);
        assert_eq!(item["media_type"], "movie");
        assert_eq!(item["title"], "A");
        assert_eq!(item["poster_path"], "/10.jpg");
        assert_eq!(item["session_count"], 1);
    }

    // ------------------------------------------------------------------
    // aggregate() over the store seam
    // ------------------------------------------------------------------

    struct FixedStore(Vec<WatchSession>);

    #[async_trait]
    impl ActivityStore for FixedStore {
        async fn fetch_sessions(
            &self,
            _user_id: &str,
            _first: NaiveDate,
            _last: NaiveDate,
        ) -> Result<Vec<WatchSession>, StoreError> {
            Ok(self.0.clone())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ActivityStore for FailingStore {
        async fn fetch_sessions(
            &self,
            _user_id: &str,
            _first: NaiveDate,
            _last: NaiveDate,
        ) -> Result<Vec<WatchSession>, StoreError> {
            Err(StoreError::unavailable("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_aggregate_over_store() {
        let store = FixedStore(vec![
            session("2024-03-05T10:00:00Z", 10, "A"),
            session("2024-03-05T20:00:00Z", 10, "A"),
        ]);
        let month = aggregate(&store, "user-1", &march_2024()).await.unwrap();
        assert_eq!(month.days[4].watched_items[0].session_count, 2);
    }

    #[tokio::test]
    async fn test_no_store_matches_empty_store_backed_output() {
        let span = march_2024();
        let ephemeral = aggregate(&NoStore, "user-1", &span).await.unwrap();
        let empty_backed = aggregate(&FixedStore(Vec::new()), "user-1", &span)
            .await
            .unwrap();
        assert_eq!(ephemeral, empty_backed);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_not_empty_month() {
        let result = aggregate(&FailingStore, "user-1", &march_2024()).await;
        assert!(matches!(result, Err(CalendarError::Store(_))));
    }

    #[test]
    fn test_media_type_round_trip() {
        assert_eq!(MediaType::parse_str("movie"), Some(MediaType::Movie));
        assert_eq!(MediaType::parse_str("series"), Some(MediaType::Series));
        assert_eq!(MediaType::parse_str("podcast"), None);
        assert_eq!(MediaType::Movie.as_str(), "movie");
        assert_eq!(
            serde_json::to_string(&MediaType::Series).unwrap(),
            "\"series\""
        );
    }
}
