//! Row-query/delete client for the hosted backend.
//!
//! Speaks the PostgREST-style row protocol: equality/range/order/limit
//! filters over the `items` table and delete-by-id. Reads and deletes only —
//! this app never creates or updates rows.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use url::Url;

use crate::board::TODAY_SLOTS;
use crate::config::Config;
use crate::model::{SongRequest, TodayRange};

/// Columns this app reads.
const SELECT_COLUMNS: &str = "id,name,url,date";
/// The one table the board consumes.
const ITEMS_TABLE: &str = "items";

/// Shared handle to the backend.
///
/// Construct once via [`Backend::new`] and pass clones around: cloning is
/// cheap and every clone shares the same inner HTTP client, so repeated
/// access never re-constructs connection state.
#[derive(Clone)]
pub struct Backend {
    inner: Arc<BackendInner>,
}

struct BackendInner {
    http: reqwest::Client,
    rows_url: Url,
}

impl Backend {
    /// Build a handle from validated configuration. The anon key is attached
    /// to every request as both the `apikey` header and bearer token.
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.supabase_url)
            .with_context(|| format!("invalid backend URL: {}", config.supabase_url))?;
        let rows_url = base
            .join(&format!("rest/v1/{ITEMS_TABLE}"))
            .context("failed to derive rows URL")?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.supabase_anon_key)
            .context("backend API key contains invalid header characters")?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.supabase_anon_key))
            .context("backend API key contains invalid header characters")?;
        bearer.set_sensitive(true);
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            inner: Arc::new(BackendInner { http, rows_url }),
        })
    }

    /// Rows scheduled inside `range`, earliest first, capped at the two
    /// presentation slots.
    pub async fn today_songs(&self, range: &TodayRange) -> Result<Vec<SongRequest>> {
        let url = self.rows_query(&[
            ("select", SELECT_COLUMNS.to_string()),
            ("date", format!("gte.{}", format_ts(&range.start))),
            ("date", format!("lt.{}", format_ts(&range.end))),
            ("order", "date.asc".to_string()),
            ("limit", TODAY_SLOTS.to_string()),
        ]);
        self.fetch_rows(url).await.context("today query failed")
    }

    /// Every row submitted by `requester`, most-recent-id first.
    ///
    /// Ordering is by id, not date: id assignment is sequential upstream, so
    /// recency-of-id stands in for chronology.
    pub async fn past_songs(&self, requester: &str) -> Result<Vec<SongRequest>> {
        let url = self.rows_query(&[
            ("select", SELECT_COLUMNS.to_string()),
            ("name", format!("eq.{requester}")),
            ("order", "id.desc".to_string()),
        ]);
        self.fetch_rows(url).await.context("past query failed")
    }

    /// Delete one row by id.
    pub async fn delete_song(&self, id: i64) -> Result<()> {
        let url = self.rows_query(&[("id", format!("eq.{id}"))]);
        let response = self
            .inner
            .http
            .delete(url)
            .send()
            .await
            .context("delete request failed")?;
        if !response.status().is_success() {
            anyhow::bail!("backend returned status: {}", response.status());
        }
        Ok(())
    }

    async fn fetch_rows(&self, url: Url) -> Result<Vec<SongRequest>> {
        let response = self
            .inner
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("request failed")?;
        if !response.status().is_success() {
            anyhow::bail!("backend returned status: {}", response.status());
        }
        response.json().await.context("failed to parse rows response")
    }

    fn rows_query(&self, params: &[(&str, String)]) -> Url {
        let mut url = self.inner.rows_url.clone();
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())));
        url
    }
}

/// RFC 3339 with milliseconds and a `Z` suffix, the form the backend's
/// timestamp filters expect.
fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_config() -> Config {
        Config {
            supabase_url: "https://example.supabase.co".to_string(),
            supabase_anon_key: "anon-key".to_string(),
            youtube_api_key: None,
            requester: "guest".to_string(),
        }
    }

    #[test]
    fn clones_share_one_handle() {
        let backend = Backend::new(&test_config()).unwrap();
        let clone = backend.clone();
        assert!(Arc::ptr_eq(&backend.inner, &clone.inner));
    }

    #[test]
    fn rows_url_targets_the_items_table() {
        let backend = Backend::new(&test_config()).unwrap();
        assert_eq!(
            backend.inner.rows_url.as_str(),
            "https://example.supabase.co/rest/v1/items"
        );
    }

    #[test]
    fn today_query_shape() {
        let backend = Backend::new(&test_config()).unwrap();
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 15, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap();
        let url = backend.rows_query(&[
            ("select", SELECT_COLUMNS.to_string()),
            ("date", format!("gte.{}", format_ts(&start))),
            ("date", format!("lt.{}", format_ts(&end))),
            ("order", "date.asc".to_string()),
            ("limit", TODAY_SLOTS.to_string()),
        ]);
        let query = url.query().unwrap();
        assert!(query.contains("select=id%2Cname%2Curl%2Cdate"));
        assert!(query.contains("date=gte.2026-03-01T15%3A00%3A00.000Z"));
        assert!(query.contains("date=lt.2026-03-02T15%3A00%3A00.000Z"));
        assert!(query.contains("order=date.asc"));
        assert!(query.contains("limit=2"));
    }

    #[test]
    fn past_query_orders_by_id_descending() {
        let backend = Backend::new(&test_config()).unwrap();
        let url = backend.rows_query(&[
            ("select", SELECT_COLUMNS.to_string()),
            ("name", "eq.guest".to_string()),
            ("order", "id.desc".to_string()),
        ]);
        let query = url.query().unwrap();
        assert!(query.contains("name=eq.guest"));
        assert!(query.contains("order=id.desc"));
    }

    #[test]
    fn timestamps_use_millisecond_z_form() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 2, 7, 30, 0).unwrap();
        assert_eq!(format_ts(&ts), "2026-03-02T07:30:00.000Z");
    }
}
