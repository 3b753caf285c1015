use serde_json::Value;

use crate::types::SearchRequest;

use super::{SearchError, SpotifySearch};

impl SpotifySearch {
    /// Searches artists by name.
    ///
    /// # Arguments
    ///
    /// * `name` - Free-text artist name, sent as the `q` parameter
    /// * `limit` - Maximum number of results; `None` leaves the choice to
    ///   the endpoint
    ///
    /// # Returns
    ///
    /// The artist objects found under `artists.items`, either freshly
    /// fetched or served from the cache delegate.
    ///
    /// # Example
    ///
    /// ```
    /// let artists = SpotifySearch::shared().search_artist("Radiohead", Some(5)).await?;
    /// ```
    pub async fn search_artist(
        &self,
        name: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, SearchError> {
        self.search(SearchRequest::artist(name, limit)).await
    }

    /// Callback flavour of [`SpotifySearch::search_artist`].
    pub fn search_artist_with<S, F>(
        &self,
        name: &str,
        limit: Option<u32>,
        on_success: S,
        on_failure: F,
    ) where
        S: FnOnce(Vec<Value>) + Send + 'static,
        F: FnOnce(SearchError) + Send + 'static,
    {
        self.dispatch(SearchRequest::artist(name, limit), on_success, on_failure);
    }
}
