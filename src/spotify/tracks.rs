use serde_json::Value;

use crate::types::SearchRequest;

use super::{SearchError, SpotifySearch};

impl SpotifySearch {
    /// Searches tracks by name, artist and album.
    ///
    /// The three fields are combined into a single field-filtered query
    /// (`track:… artist:… album:…`). Blank fields are left out of the query
    /// but still take part in the cache key.
    pub async fn get_track(
        &self,
        name: &str,
        artist: &str,
        album: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, SearchError> {
        self.search(SearchRequest::track(name, artist, album, limit))
            .await
    }

    /// Looks up a single track by its Spotify identifier.
    ///
    /// The track object is returned as a one-element array so that both
    /// track operations share a result shape.
    pub async fn get_track_by_id(&self, id: &str) -> Result<Vec<Value>, SearchError> {
        self.search(SearchRequest::track_id(id)).await
    }

    /// Callback flavour of [`SpotifySearch::get_track`].
    pub fn get_track_with<S, F>(
        &self,
        name: &str,
        artist: &str,
        album: &str,
        limit: Option<u32>,
        on_success: S,
        on_failure: F,
    ) where
        S: FnOnce(Vec<Value>) + Send + 'static,
        F: FnOnce(SearchError) + Send + 'static,
    {
        self.dispatch(
            SearchRequest::track(name, artist, album, limit),
            on_success,
            on_failure,
        );
    }

    /// Callback flavour of [`SpotifySearch::get_track_by_id`].
    pub fn get_track_by_id_with<S, F>(&self, id: &str, on_success: S, on_failure: F)
    where
        S: FnOnce(Vec<Value>) + Send + 'static,
        F: FnOnce(SearchError) + Send + 'static,
    {
        self.dispatch(SearchRequest::track_id(id), on_success, on_failure);
    }
}
