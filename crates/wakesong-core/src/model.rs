//! Row shapes and the today-range query bounds.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

/// One persisted request row, as returned by the backend.
///
/// Read-only shape: rows are created by an external submission path and only
/// read or deleted by this app.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SongRequest {
    pub id: i64,
    /// Requester display name.
    pub name: String,
    /// Video page URL as submitted; may be malformed or absent.
    pub url: Option<String>,
    /// Submission/scheduling timestamp, UTC-normalized.
    pub date: DateTime<Utc>,
}

/// A request plus its read-side metadata projection.
///
/// Never persisted — recomputed on every load and discarded with the view.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSong {
    pub request: SongRequest,
    /// Resolved display title, or the fallback sentinel.
    pub title: String,
    /// Derived image URL, `None` when the video id could not be extracted
    /// (the today pane renders a fallback glyph in that case).
    pub thumbnail: Option<String>,
}

/// Half-open UTC bounds of a local calendar day: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TodayRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The local day's span expressed in UTC for backend filtering.
pub fn today_range() -> TodayRange {
    local_day_range(Local::now().date_naive())
}

fn local_day_range(day: NaiveDate) -> TodayRange {
    TodayRange {
        start: local_midnight_utc(day),
        end: local_midnight_utc(day + Duration::days(1)),
    }
}

fn local_midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    // DST can skip or duplicate local midnight; take the earliest valid
    // instant, reading the naive time as UTC when the day starts in a gap.
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
