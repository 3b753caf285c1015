use std::{collections::BTreeMap, time::Duration};

use serde_json::Value;

use crate::{
    spotify::SearchError,
    types::{Artist, ArtistTableRow, SearchKind, Track, TrackTableRow},
};

/// Builds the stable cache key for a request.
///
/// The key is the search kind followed by the url-encoded parameters in
/// key order, e.g. `artist?limit=5&name=Radiohead`. Values are encoded so a
/// separator inside a parameter cannot make two requests collide.
pub fn build_cache_key(kind: SearchKind, params: &BTreeMap<String, String>) -> String {
    let encoded: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect();
    format!("{kind}?{}", encoded.join("&"))
}

/// Composes the search term for a metadata track search.
///
/// Blank fields are left out so that `album` may be omitted without
/// producing an empty `album:` filter.
pub fn build_track_query(name: &str, artist: &str, album: &str) -> String {
    [("track", name), ("artist", artist), ("album", album)]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(field, value)| format!("{}:{}", field, value.trim()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pulls the result array out of a decoded response body.
///
/// Search responses nest their items under `artists.items` or
/// `tracks.items`; a direct track lookup returns a single object which is
/// wrapped into a one-element array.
pub fn extract_items(kind: SearchKind, body: Value) -> Result<Vec<Value>, SearchError> {
    let container = match kind {
        SearchKind::Artist => "artists",
        SearchKind::Track => "tracks",
        SearchKind::TrackId => {
            return match body {
                Value::Object(_) => Ok(vec![body]),
                other => Err(SearchError::new(format!(
                    "Malformed track response: expected an object, got {}",
                    json_type(&other)
                ))),
            };
        }
    };

    match body.get(container).and_then(|c| c.get("items")) {
        Some(Value::Array(items)) => Ok(items.clone()),
        _ => Err(SearchError::new(format!(
            "Malformed search response: missing {}.items array",
            container
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses a number of seconds, as accepted by the environment settings.
pub fn parse_seconds(value: &str) -> Result<Duration, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("value cannot be empty".to_string());
    }

    let secs: f64 = trimmed
        .parse()
        .map_err(|_| format!("invalid number of seconds '{}'", trimmed))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("invalid number of seconds '{}'", trimmed));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("number of seconds '{}' is out of range", trimmed))
}

/// Formats a track length in milliseconds as `m:ss`.
pub fn format_duration_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Converts opaque artist results into table rows, skipping values that do
/// not look like artists.
pub fn artist_table_rows(items: &[Value]) -> Vec<ArtistTableRow> {
    items
        .iter()
        .filter_map(|item| serde_json::from_value::<Artist>(item.clone()).ok())
        .map(|a| ArtistTableRow {
            name: a.name,
            genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
            popularity: a.popularity.map(|p| p.to_string()).unwrap_or_default(),
            id: a.id,
        })
        .collect()
}

/// Converts opaque track results into table rows, skipping values that do
/// not look like tracks.
pub fn track_table_rows(items: &[Value]) -> Vec<TrackTableRow> {
    items
        .iter()
        .filter_map(|item| serde_json::from_value::<Track>(item.clone()).ok())
        .map(|t| TrackTableRow {
            name: t.name,
            artists: t
                .artists
                .iter()
                .map(|a| a.name.clone())
                .collect::<Vec<_>>()
                .join(", "),
            album: t.album.map(|a| a.name).unwrap_or_default(),
            duration: t.duration_ms.map(format_duration_ms).unwrap_or_default(),
            id: t.id,
        })
        .collect()
}
