use serde_json::Value;
use tracing::{debug, warn};

use crate::{config::SearchSettings, types::SearchRequest, utils};

use super::{SearchError, SpotifySearch};

impl SpotifySearch {
    /// Runs one request through the cache and, on a miss, the network.
    ///
    /// A cache hit is returned unchanged without touching the network. A
    /// successful fetch is written through to the cache delegate under the
    /// same key it is read back with. Failures are never cached.
    pub async fn search(&self, request: SearchRequest) -> Result<Vec<Value>, SearchError> {
        let settings = self.settings();
        let key = request.cache_key();

        if let Some(cache) = self.cache_delegate() {
            if let Some(items) = cache.cached_array_for_key(&key) {
                debug!(%key, count = items.len(), "cache hit");
                return Ok(items);
            }
            debug!(%key, "cache miss");
        }

        let items = match self.fetch(&request, &settings).await {
            Ok(items) => items,
            Err(e) => {
                warn!(kind = %request.kind, error = %e, "search request failed");
                return Err(e);
            }
        };

        if let Some(cache) = self.cache_delegate() {
            cache.cache_array(&items, &key, &request.params(), settings.max_cache_age);
        }

        Ok(items)
    }

    /// Issues the GET for a request and decodes the result array.
    async fn fetch(
        &self,
        request: &SearchRequest,
        settings: &SearchSettings,
    ) -> Result<Vec<Value>, SearchError> {
        let api_url = format!("{}{}", settings.api_url, request.path());
        let query = request.query();
        debug!(url = %api_url, ?query, "sending search request");

        let mut builder = self
            .http
            .get(&api_url)
            .timeout(settings.timeout_interval);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(token) = &settings.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?.error_for_status()?;
        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;

        utils::extract_items(request.kind, value)
    }

    /// Runs a request on a spawned task and reports through callbacks.
    ///
    /// Exactly one of the callbacks is called, exactly once. Must be called
    /// from within a Tokio runtime.
    pub(crate) fn dispatch<S, F>(&self, request: SearchRequest, on_success: S, on_failure: F)
    where
        S: FnOnce(Vec<Value>) + Send + 'static,
        F: FnOnce(SearchError) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            match client.search(request).await {
                Ok(items) => on_success(items),
                Err(e) => on_failure(e),
            }
        });
    }
}
