//! # CLI Module
//!
//! Command implementations for the `spotsearch` binary. Each command
//! configures the shared [`SpotifySearch`] instance, attaches the on-disk
//! cache unless asked not to, runs one search and renders the result as a
//! table or as JSON.
//!
//! ## Commands
//!
//! - [`search_artists`] - Artist search by name
//! - [`search_tracks`] - Track search by name, artist and album
//! - [`lookup_track`] - Track lookup by Spotify identifier
//! - [`cache_info`] / [`clear_cache`] - Inspect or wipe the on-disk cache
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotsearch artist Radiohead --limit 5
//! spotsearch track "Karma Police" --artist Radiohead --album "OK Computer"
//! spotsearch track-id 63OQupATfueTdZMWTxW03A --json
//! spotsearch cache clear
//! ```

mod artists;
mod cache;
mod tracks;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{management::DiskCache, spotify::SpotifySearch, warning};

pub use artists::search_artists;
pub use cache::cache_info;
pub use cache::clear_cache;
pub use tracks::lookup_track;
pub use tracks::search_tracks;

/// Flags shared by every search command.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Print the raw result array as JSON instead of a table.
    pub json: bool,
    /// Skip the on-disk cache for reads and writes.
    pub no_cache: bool,
    /// Overrides the configured max cache age, in seconds.
    pub max_age: Option<u64>,
    /// Overrides the configured request timeout, in seconds.
    pub timeout: Option<u64>,
}

/// Applies command-line overrides to the shared client.
fn prepare_client(opts: &SearchOptions) -> &'static SpotifySearch {
    let client = SpotifySearch::shared();
    if let Some(secs) = opts.max_age {
        client.set_max_cache_age(Duration::from_secs(secs));
    }
    if let Some(secs) = opts.timeout {
        client.set_timeout_interval(Duration::from_secs(secs));
    }
    client
}

/// Loads the on-disk cache and installs it as the delegate of `client`.
///
/// The returned `Arc` must be kept alive for as long as the cache should be
/// used, since the client only holds a weak reference.
async fn attach_cache(client: &SpotifySearch, opts: &SearchOptions) -> Option<Arc<DiskCache>> {
    if opts.no_cache {
        client.clear_cache_delegate();
        return None;
    }

    let cache = match DiskCache::load(DiskCache::default_path()).await {
        Ok(cache) => cache,
        Err(e) => {
            warning!("Cannot read search cache, starting empty. Err: {}", e);
            DiskCache::new(DiskCache::default_path())
        }
    };

    let cache = Arc::new(cache);
    client.set_cache_delegate(&cache);
    Some(cache)
}

async fn persist_cache(cache: Option<Arc<DiskCache>>) {
    if let Some(cache) = cache {
        if let Err(e) = cache.persist().await {
            warning!("Failed to save search cache. Err: {}", e);
        }
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

fn print_json(items: &[serde_json::Value]) {
    match serde_json::to_string_pretty(items) {
        Ok(json) => println!("{}", json),
        Err(e) => warning!("Cannot render results as JSON. Err: {}", e),
    }
}
