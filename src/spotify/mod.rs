//! # Spotify Search Module
//!
//! This module is the client for the search endpoints of the Spotify Web
//! API. It builds the request for one of three search kinds, consults the
//! optional cache delegate, issues a single GET when the cache has nothing
//! and hands back the decoded result array or a [`SearchError`].
//!
//! ## Architecture
//!
//! ```text
//! Caller (library host, CLI)
//!          ↓
//! SpotifySearch
//!     ├── Artist search      GET /search?type=artist
//!     ├── Track search       GET /search?type=track
//!     └── Track lookup       GET /tracks/{id}
//!          ↓               ↘
//! HTTP Layer (reqwest)     Cache delegate (host supplied)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Shared instance
//!
//! [`SpotifySearch::shared`] returns a process-wide instance created on
//! first use. Its configuration may be changed at any time; every request
//! works on a snapshot taken when it starts. Independent instances can be
//! built with [`SpotifySearch::new`].
//!
//! ## Result delivery
//!
//! Every operation is available twice:
//! - as an `async fn` returning `Result<Vec<Value>, SearchError>`,
//! - as a `*_with` variant taking a success and a failure callback. It
//!   returns immediately and calls exactly one of the two callbacks exactly
//!   once from a Tokio worker.
//!
//! There is no retry, no rate-limit handling and no cancellation.

mod artists;
mod error;
mod search;
mod tracks;

use std::{
    sync::{Arc, LazyLock, PoisonError, RwLock, Weak},
    time::Duration,
};

use reqwest::Client;

use crate::{config::SearchSettings, management::SearchCache};

pub use error::SearchError;

static SHARED: LazyLock<SpotifySearch> = LazyLock::new(|| {
    let settings = SearchSettings::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid search settings in environment, using defaults");
        SearchSettings::default()
    });
    SpotifySearch::new(settings)
});

/// Client for the Spotify search endpoints.
///
/// Cloning is cheap and every clone shares configuration and cache
/// delegate with the original.
#[derive(Clone)]
pub struct SpotifySearch {
    http: Client,
    settings: Arc<RwLock<SearchSettings>>,
    cache: Arc<RwLock<Option<Weak<dyn SearchCache>>>>,
}

impl Default for SpotifySearch {
    fn default() -> Self {
        Self::new(SearchSettings::default())
    }
}

impl SpotifySearch {
    /// Builds an independent client with its own configuration and no cache
    /// delegate.
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            http: Client::new(),
            settings: Arc::new(RwLock::new(settings)),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// The process-wide instance, configured from the environment the first
    /// time it is used.
    pub fn shared() -> &'static SpotifySearch {
        &SHARED
    }

    /// A snapshot of the current configuration.
    pub fn settings(&self) -> SearchSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Per-request timeout enforced by the HTTP transport.
    pub fn timeout_interval(&self) -> Duration {
        self.settings().timeout_interval
    }

    /// Changes the timeout used by requests started after this call.
    pub fn set_timeout_interval(&self, timeout: Duration) {
        self.update_settings(|s| s.timeout_interval = timeout);
    }

    /// Age handed to the cache delegate with every write.
    pub fn max_cache_age(&self) -> Duration {
        self.settings().max_cache_age
    }

    /// Changes the age handed to the cache delegate on later writes.
    pub fn set_max_cache_age(&self, max_age: Duration) {
        self.update_settings(|s| s.max_cache_age = max_age);
    }

    /// Base URL every endpoint path is appended to.
    pub fn api_url(&self) -> String {
        self.settings().api_url
    }

    /// Points the client at another base URL. A trailing slash is dropped.
    pub fn set_api_url(&self, url: &str) {
        let url = url.trim_end_matches('/').to_string();
        self.update_settings(|s| s.api_url = url);
    }

    /// Sets or removes the bearer token sent with every request.
    pub fn set_access_token(&self, token: Option<String>) {
        self.update_settings(|s| s.access_token = token);
    }

    /// Installs the cache delegate.
    ///
    /// The client only keeps a weak reference: once the host drops its last
    /// `Arc`, the client behaves as if no delegate was configured.
    pub fn set_cache_delegate<C>(&self, cache: &Arc<C>)
    where
        C: SearchCache + 'static,
    {
        let weak: Weak<C> = Arc::downgrade(cache);
        let weak: Weak<dyn SearchCache> = weak;
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Some(weak);
    }

    /// Removes the cache delegate; every request goes to the network.
    pub fn clear_cache_delegate(&self) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The delegate, if one is configured and still alive.
    pub fn cache_delegate(&self) -> Option<Arc<dyn SearchCache>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    fn update_settings<F>(&self, update: F)
    where
        F: FnOnce(&mut SearchSettings),
    {
        let mut settings = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut settings);
    }
}
