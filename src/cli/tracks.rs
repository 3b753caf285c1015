use serde_json::Value;
use tabled::Table;

use crate::{error, info, success, utils};

use super::{SearchOptions, attach_cache, persist_cache, prepare_client, print_json, spinner};

pub async fn search_tracks(
    name: String,
    artist: String,
    album: String,
    limit: Option<u32>,
    opts: SearchOptions,
) {
    let client = prepare_client(&opts);
    let cache = attach_cache(client, &opts).await;

    let pb = spinner("Searching tracks...");
    let result = client.get_track(&name, &artist, &album, limit).await;
    pb.finish_and_clear();

    persist_cache(cache).await;

    match result {
        Ok(tracks) => render_tracks(&tracks, &name, opts.json),
        Err(e) => error!("Track search for '{}' failed. Err: {}", name, e),
    }
}

pub async fn lookup_track(id: String, opts: SearchOptions) {
    let client = prepare_client(&opts);
    let cache = attach_cache(client, &opts).await;

    let pb = spinner("Fetching track...");
    let result = client.get_track_by_id(&id).await;
    pb.finish_and_clear();

    persist_cache(cache).await;

    match result {
        Ok(tracks) => render_tracks(&tracks, &id, opts.json),
        Err(e) => error!("Track lookup for '{}' failed. Err: {}", id, e),
    }
}

fn render_tracks(tracks: &[Value], query: &str, json: bool) {
    if json {
        print_json(tracks);
        return;
    }

    let rows = utils::track_table_rows(tracks);
    if rows.is_empty() {
        info!("No tracks found for '{}'.", query);
        return;
    }

    success!("Found {} tracks for '{}'", rows.len(), query);
    println!("{}", Table::new(rows));
}
