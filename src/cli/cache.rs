use crate::{error, info, management::DiskCache, success};

pub async fn cache_info() {
    let cache = match DiskCache::load(DiskCache::default_path()).await {
        Ok(cache) => cache,
        Err(e) => error!("Cannot read search cache. Err: {}", e),
    };

    info!("Cache file: {}", cache.path().display());
    info!("Cached searches: {}", cache.len());
}

pub async fn clear_cache() {
    let cache = DiskCache::new(DiskCache::default_path());
    if let Err(e) = cache.clear().await {
        error!("Failed to clear search cache. Err: {}", e);
    }
    success!("Search cache cleared.");
}
