//! Enrichment batch behavior against a local stand-in metadata endpoint:
//! every lookup settles, each row falls back independently, and one slow or
//! failing lookup never takes its siblings down with it.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::RawQuery;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use chrono::{TimeZone, Utc};

use wakesong_core::model::SongRequest;
use wakesong_core::video::{enrich, thumbnail_url, VideoLookup, FALLBACK_TITLE};

fn param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Scripted videos endpoint: the id selects the response shape.
async fn videos(RawQuery(query): RawQuery) -> (StatusCode, String) {
    let query = query.unwrap_or_default();
    if param(&query, "key").is_none() {
        return (StatusCode::FORBIDDEN, "missing key".to_string());
    }
    let id = param(&query, "id").unwrap_or_default();
    match id.as_str() {
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
        "garbage" => (StatusCode::OK, "not json at all".to_string()),
        "slow" => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            (StatusCode::OK, title_body("Slow Sunrise"))
        }
        "good" => (StatusCode::OK, title_body("Morning Anthem")),
        _ => (StatusCode::OK, r#"{"items":[]}"#.to_string()),
    }
}

fn title_body(title: &str) -> String {
    format!(r#"{{"items":[{{"snippet":{{"title":"{title}"}}}}]}}"#)
}

async fn serve() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock listener");
    let addr = listener.local_addr().unwrap();
    let router = Router::new().route("/videos", get(videos));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn request(id: i64, url: Option<&str>) -> SongRequest {
    SongRequest {
        id,
        name: "guest".to_string(),
        url: url.map(str::to_string),
        date: Utc.with_ymd_and_hms(2026, 3, 2, 7, 30, 0).unwrap(),
    }
}

#[tokio::test]
async fn batch_settles_every_row_independently() {
    let addr = serve().await;
    let lookup = VideoLookup::with_endpoint(
        Some("test-key".to_string()),
        format!("http://{addr}/videos"),
    );

    let rows = vec![
        request(1, Some("https://youtu.be/good")),
        request(2, Some("https://www.youtube.com/watch?v=slow")),
        request(3, Some("https://youtu.be/broken")),
        request(4, Some("https://youtu.be/garbage")),
        request(5, Some("::: not a url :::")),
        request(6, None),
    ];

    let enriched = enrich(&lookup, rows, true).await;
    assert_eq!(enriched.len(), 6, "the batch publishes only once complete");

    let by_id = |id: i64| enriched.iter().find(|s| s.request.id == id).unwrap();

    // Resolved titles, including the slow sibling.
    assert_eq!(by_id(1).title, "Morning Anthem");
    assert_eq!(by_id(2).title, "Slow Sunrise");

    // Server error, malformed body, unparseable URL, absent URL: each falls
    // back on its own without disturbing the rest.
    for id in [3, 4, 5, 6] {
        assert_eq!(by_id(id).title, FALLBACK_TITLE);
    }

    // Thumbnails are keyed by the extracted id, present even when the title
    // lookup failed, absent only when no id could be extracted.
    assert_eq!(by_id(1).thumbnail.as_deref(), Some(thumbnail_url("good").as_str()));
    assert_eq!(by_id(3).thumbnail.as_deref(), Some(thumbnail_url("broken").as_str()));
    assert!(by_id(5).thumbnail.is_none());
    assert!(by_id(6).thumbnail.is_none());
}

#[tokio::test]
async fn past_rows_skip_thumbnails() {
    let addr = serve().await;
    let lookup = VideoLookup::with_endpoint(
        Some("test-key".to_string()),
        format!("http://{addr}/videos"),
    );

    let enriched = enrich(&lookup, vec![request(1, Some("https://youtu.be/good"))], false).await;
    assert_eq!(enriched[0].title, "Morning Anthem");
    assert!(enriched[0].thumbnail.is_none());
}

#[tokio::test]
async fn missing_api_key_degrades_to_the_sentinel() {
    let addr = serve().await;
    // No key configured: the request still fires, the endpoint rejects it,
    // and the title quietly falls back.
    let lookup = VideoLookup::with_endpoint(None, format!("http://{addr}/videos"));

    let enriched = enrich(&lookup, vec![request(1, Some("https://youtu.be/good"))], true).await;
    assert_eq!(enriched[0].title, FALLBACK_TITLE);
    assert_eq!(
        enriched[0].thumbnail.as_deref(),
        Some(thumbnail_url("good").as_str()),
        "thumbnails derive from the id, not the lookup"
    );
}
