use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use mockito::{Matcher, Server, ServerGuard};
use serde_json::{Value, json};
use spotsearch::{
    config::SearchSettings,
    management::{MemoryCache, SearchCache},
    spotify::{SearchError, SpotifySearch},
    types::SearchRequest,
};

// Helper function to build a client pointed at the mock server
fn client_for(server: &ServerGuard) -> SpotifySearch {
    SpotifySearch::new(SearchSettings {
        api_url: server.url(),
        timeout_interval: Duration::from_secs(5),
        max_cache_age: Duration::from_secs(60),
        ..SearchSettings::default()
    })
}

fn artist_body() -> Value {
    json!({
        "artists": {
            "href": "https://api.spotify.com/v1/search?query=Radiohead&type=artist",
            "items": [
                { "id": "4Z8W4fKeB5YxbusRsdQVPb", "name": "Radiohead", "genres": ["art rock"] },
                { "id": "0fA0VVWsXO9YnASrzqfmYu", "name": "Radiohead Tribute", "genres": [] }
            ],
            "limit": 5,
            "total": 2
        }
    })
}

fn track_body() -> Value {
    json!({
        "tracks": {
            "items": [
                {
                    "id": "63OQupATfueTdZMWTxW03A",
                    "name": "Karma Police",
                    "artists": [{ "id": "4Z8W4fKeB5YxbusRsdQVPb", "name": "Radiohead" }],
                    "album": { "id": "6dVIqQ8qmQ5GBnJ9shOYGE", "name": "OK Computer" },
                    "duration_ms": 264066
                }
            ]
        }
    })
}

/// Records every write it receives and never serves anything.
#[derive(Default)]
struct WriteOnlyCache {
    writes: Mutex<Vec<(String, BTreeMap<String, String>, Duration)>>,
}

impl SearchCache for WriteOnlyCache {
    fn cache_array(
        &self,
        _array: &[Value],
        key: &str,
        params: &BTreeMap<String, String>,
        max_age: Duration,
    ) {
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), params.clone(), max_age));
    }
}

/// Implements neither capability method.
struct EmptyCache;

impl SearchCache for EmptyCache {}

#[tokio::test]
async fn test_search_artist_without_cache_issues_one_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "Radiohead".into()),
            Matcher::UrlEncoded("type".into(), "artist".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(artist_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let artists = client.search_artist("Radiohead", Some(5)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(artists.len(), 2);
    assert_eq!(artists[0]["name"], "Radiohead");
    assert_eq!(artists, artist_body()["artists"]["items"].as_array().unwrap().clone());
}

#[tokio::test]
async fn test_cache_hit_skips_network() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .with_status(200)
        .with_body(artist_body().to_string())
        .expect(0)
        .create_async()
        .await;

    let cached = vec![json!({ "id": "cached", "name": "From Cache" })];
    let request = SearchRequest::artist("Radiohead", Some(5));
    let cache = Arc::new(MemoryCache::new());
    cache.cache_array(
        &cached,
        &request.cache_key(),
        &request.params(),
        Duration::from_secs(60),
    );

    let client = client_for(&server);
    client.set_cache_delegate(&cache);
    let artists = client.search_artist("Radiohead", Some(5)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(artists, cached);
}

#[tokio::test]
async fn test_expired_entry_counts_as_miss() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(artist_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let request = SearchRequest::artist("Radiohead", None);
    let cache = Arc::new(MemoryCache::new());
    cache.cache_array(
        &[json!({ "id": "stale" })],
        &request.cache_key(),
        &request.params(),
        Duration::ZERO,
    );

    let client = client_for(&server);
    client.set_cache_delegate(&cache);
    let artists = client.search_artist("Radiohead", None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(artists.len(), 2);
}

#[tokio::test]
async fn test_successful_fetch_is_written_and_read_back() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(artist_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let cache = Arc::new(MemoryCache::new());
    let client = client_for(&server);
    client.set_cache_delegate(&cache);

    let first = client.search_artist("Radiohead", Some(5)).await.unwrap();
    let second = client.search_artist("Radiohead", Some(5)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);

    let request = SearchRequest::artist("Radiohead", Some(5));
    let entry = cache.entry(&request.cache_key()).unwrap();
    assert_eq!(entry.items, first);
    assert_eq!(entry.params, request.params());
    assert_eq!(entry.max_age_ms, 60_000);
}

#[tokio::test]
async fn test_cache_write_receives_configured_max_age() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(track_body().to_string())
        .create_async()
        .await;

    let cache = Arc::new(WriteOnlyCache::default());
    let client = client_for(&server);
    client.set_cache_delegate(&cache);
    client.set_max_cache_age(Duration::from_secs(900));

    client
        .get_track("Karma Police", "Radiohead", "OK Computer", None)
        .await
        .unwrap();

    let writes = cache.writes.lock().unwrap();
    let request = SearchRequest::track("Karma Police", "Radiohead", "OK Computer", None);
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, request.cache_key());
    assert_eq!(writes[0].1, request.params());
    assert_eq!(writes[0].2, Duration::from_secs(900));
}

#[tokio::test]
async fn test_cache_without_read_capability_always_fetches() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(artist_body().to_string())
        .expect(2)
        .create_async()
        .await;

    let cache = Arc::new(WriteOnlyCache::default());
    let client = client_for(&server);
    client.set_cache_delegate(&cache);

    client.search_artist("Radiohead", None).await.unwrap();
    client.search_artist("Radiohead", None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(cache.writes.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_cache_without_any_capability_is_a_miss() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(artist_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let cache = Arc::new(EmptyCache);
    let client = client_for(&server);
    client.set_cache_delegate(&cache);

    let artists = client.search_artist("Radiohead", None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(artists.len(), 2);
}

#[tokio::test]
async fn test_dropped_delegate_behaves_like_no_cache() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(artist_body().to_string())
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    let cache = Arc::new(MemoryCache::new());
    client.set_cache_delegate(&cache);
    drop(cache);

    assert!(client.cache_delegate().is_none());
    client.search_artist("Radiohead", None).await.unwrap();
    client.search_artist("Radiohead", None).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_error_fails_and_does_not_cache() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"error":{"status":500,"message":"Server error"}}"#)
        .create_async()
        .await;

    let cache = Arc::new(MemoryCache::new());
    let client = client_for(&server);
    client.set_cache_delegate(&cache);

    let err = client.search_artist("Radiohead", None).await.unwrap_err();

    assert!(err.description().contains("500"));
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_undecodable_body_fails() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let cache = Arc::new(MemoryCache::new());
    let client = client_for(&server);
    client.set_cache_delegate(&cache);

    let err = client.search_artist("Radiohead", None).await.unwrap_err();

    assert!(err.to_string().starts_with("Malformed response body"));
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_body_without_items_fails() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"tracks":{"items":[]}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.search_artist("Radiohead", None).await.unwrap_err();

    assert!(err.description().contains("artists.items"));
}

#[tokio::test]
async fn test_unreachable_server_fails() {
    let client = SpotifySearch::new(SearchSettings {
        api_url: "http://127.0.0.1:1".to_string(),
        timeout_interval: Duration::from_secs(2),
        ..SearchSettings::default()
    });

    let result = client.get_track_by_id("63OQupATfueTdZMWTxW03A").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_timeout_interval_expiry_fails() {
    // Accepts connections and never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = SpotifySearch::new(SearchSettings {
        api_url: format!("http://{}", addr),
        timeout_interval: Duration::from_millis(300),
        ..SearchSettings::default()
    });

    let started = std::time::Instant::now();
    let err = client.search_artist("Radiohead", None).await.unwrap_err();

    assert!(err.description().contains("timed out"), "{}", err.description());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_get_track_sends_composite_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "q".into(),
                "track:Karma Police artist:Radiohead album:OK Computer".into(),
            ),
            Matcher::UrlEncoded("type".into(), "track".into()),
            Matcher::UrlEncoded("limit".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(track_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let tracks = client
        .get_track("Karma Police", "Radiohead", "OK Computer", Some(1))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0]["id"], "63OQupATfueTdZMWTxW03A");
}

#[tokio::test]
async fn test_get_track_by_id_wraps_object() {
    let mut server = Server::new_async().await;
    let track = json!({ "id": "63OQupATfueTdZMWTxW03A", "name": "Karma Police" });
    let mock = server
        .mock("GET", "/tracks/63OQupATfueTdZMWTxW03A")
        .with_status(200)
        .with_body(track.to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let tracks = client
        .get_track_by_id("63OQupATfueTdZMWTxW03A")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(tracks, vec![track]);
}

#[tokio::test]
async fn test_access_token_is_sent_as_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_body(artist_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    client.set_access_token(Some("secret-token".to_string()));
    client.search_artist("Radiohead", None).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_callback_success_fires_exactly_once() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(artist_body().to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Result<Vec<Value>, SearchError>>();
    let failure_tx = tx.clone();

    client.search_artist_with(
        "Radiohead",
        Some(5),
        move |items| {
            let _ = tx.send(Ok(items));
        },
        move |e| {
            let _ = failure_tx.send(Err(e));
        },
    );

    let first = rx.recv().await.unwrap();
    assert_eq!(first.unwrap().len(), 2);
    // both senders are dropped once the task is done
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_callback_failure_fires_exactly_once() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/tracks/missing")
        .with_status(404)
        .create_async()
        .await;

    let cache = Arc::new(MemoryCache::new());
    let client = client_for(&server);
    client.set_cache_delegate(&cache);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Result<Vec<Value>, SearchError>>();
    let failure_tx = tx.clone();

    client.get_track_by_id_with(
        "missing",
        move |items| {
            let _ = tx.send(Ok(items));
        },
        move |e| {
            let _ = failure_tx.send(Err(e));
        },
    );

    let first = rx.recv().await.unwrap();
    assert!(first.unwrap_err().description().contains("404"));
    assert!(rx.recv().await.is_none());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_callback_serves_cache_hit() {
    let server = Server::new_async().await;
    let client = client_for(&server);

    let cached = vec![json!({ "id": "cached-track" })];
    let request = SearchRequest::track("Karma Police", "Radiohead", "", None);
    let cache = Arc::new(MemoryCache::new());
    cache.cache_array(
        &cached,
        &request.cache_key(),
        &request.params(),
        Duration::from_secs(60),
    );
    client.set_cache_delegate(&cache);

    let (tx, rx) = tokio::sync::oneshot::channel();
    client.get_track_with(
        "Karma Police",
        "Radiohead",
        "",
        None,
        move |items| {
            let _ = tx.send(items);
        },
        |e| panic!("unexpected failure: {}", e),
    );

    assert_eq!(rx.await.unwrap(), cached);
}

#[test]
fn test_shared_instance_is_a_singleton() {
    assert!(std::ptr::eq(SpotifySearch::shared(), SpotifySearch::shared()));
}

#[test]
fn test_configuration_setters() {
    let client = SpotifySearch::default();
    let clone = client.clone();

    client.set_timeout_interval(Duration::from_secs(7));
    client.set_max_cache_age(Duration::from_secs(120));
    client.set_api_url("http://localhost:9999/v1/");

    // clones share configuration
    assert_eq!(clone.timeout_interval(), Duration::from_secs(7));
    assert_eq!(clone.max_cache_age(), Duration::from_secs(120));
    assert_eq!(clone.api_url(), "http://localhost:9999/v1");
}

#[test]
fn test_clear_cache_delegate() {
    let client = SpotifySearch::default();
    let cache = Arc::new(MemoryCache::new());

    client.set_cache_delegate(&cache);
    assert!(client.cache_delegate().is_some());

    client.clear_cache_delegate();
    assert!(client.cache_delegate().is_none());
}
