use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

use crate::utils;

/// The three request shapes the client knows about.
///
/// The kind decides the endpoint, the shape of the query and the prefix of
/// the cache key, so two requests of different kinds never share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchKind {
    Artist,
    Track,
    TrackId,
}

impl SearchKind {
    pub const ALL: [SearchKind; 3] = [SearchKind::Artist, SearchKind::Track, SearchKind::TrackId];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Artist => "artist",
            SearchKind::Track => "track",
            SearchKind::TrackId => "track_id",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One query against the search endpoints.
///
/// For [`SearchKind::TrackId`] the identifier is carried in `name` and the
/// remaining fields are unused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub kind: SearchKind,
    pub name: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub limit: Option<u32>,
}

impl SearchRequest {
    pub fn artist(name: &str, limit: Option<u32>) -> Self {
        Self {
            kind: SearchKind::Artist,
            name: name.to_string(),
            artist: None,
            album: None,
            limit,
        }
    }

    pub fn track(name: &str, artist: &str, album: &str, limit: Option<u32>) -> Self {
        Self {
            kind: SearchKind::Track,
            name: name.to_string(),
            artist: Some(artist.to_string()),
            album: Some(album.to_string()),
            limit,
        }
    }

    pub fn track_id(id: &str) -> Self {
        Self {
            kind: SearchKind::TrackId,
            name: id.to_string(),
            artist: None,
            album: None,
            limit: None,
        }
    }

    /// Path of the endpoint relative to the API base URL.
    pub fn path(&self) -> String {
        match self.kind {
            SearchKind::Artist | SearchKind::Track => "/search".to_string(),
            SearchKind::TrackId => format!("/tracks/{}", urlencoding::encode(&self.name)),
        }
    }

    /// Query string parameters sent with the request.
    ///
    /// A missing limit is left out so the endpoint default applies.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = match self.kind {
            SearchKind::Artist => vec![
                ("q", self.name.clone()),
                ("type", "artist".to_string()),
            ],
            SearchKind::Track => vec![
                (
                    "q",
                    utils::build_track_query(
                        &self.name,
                        self.artist.as_deref().unwrap_or_default(),
                        self.album.as_deref().unwrap_or_default(),
                    ),
                ),
                ("type", "track".to_string()),
            ],
            SearchKind::TrackId => Vec::new(),
        };

        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }

    /// The caller-facing parameters of this request, handed to the cache on
    /// write.
    pub fn params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        match self.kind {
            SearchKind::Artist => {
                params.insert("name".to_string(), self.name.clone());
            }
            SearchKind::Track => {
                params.insert("name".to_string(), self.name.clone());
                params.insert(
                    "artist".to_string(),
                    self.artist.clone().unwrap_or_default(),
                );
                params.insert("album".to_string(), self.album.clone().unwrap_or_default());
            }
            SearchKind::TrackId => {
                params.insert("id".to_string(), self.name.clone());
            }
        }
        if let Some(limit) = self.limit {
            params.insert("limit".to_string(), limit.to_string());
        }
        params
    }

    pub fn cache_key(&self) -> String {
        utils::build_cache_key(self.kind, &self.params())
    }
}

/// A stored search result as kept by the bundled caches.
///
/// Timestamps and ages are in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    pub items: Vec<Value>,
    pub params: BTreeMap<String, String>,
    pub stored_at_ms: i64,
    pub max_age_ms: u64,
}

impl CacheEntry {
    /// An entry is fresh while `now - stored_at < max_age`.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        let age = now_ms.saturating_sub(self.stored_at_ms);
        age < 0 || age as u64 >= self.max_age_ms
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: Option<u32>,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub genres: String,
    pub popularity: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    #[serde(default)]
    pub album: Option<TrackAlbum>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artists: String,
    pub album: String,
    pub duration: String,
    pub id: String,
}
