use tabled::Table;

use crate::{error, info, success, utils};

use super::{SearchOptions, attach_cache, persist_cache, prepare_client, print_json, spinner};

pub async fn search_artists(name: String, limit: Option<u32>, opts: SearchOptions) {
    let client = prepare_client(&opts);
    let cache = attach_cache(client, &opts).await;

    let pb = spinner("Searching artists...");
    let result = client.search_artist(&name, limit).await;
    pb.finish_and_clear();

    persist_cache(cache).await;

    let artists = match result {
        Ok(artists) => artists,
        Err(e) => error!("Artist search for '{}' failed. Err: {}", name, e),
    };

    if opts.json {
        print_json(&artists);
        return;
    }

    let rows = utils::artist_table_rows(&artists);
    if rows.is_empty() {
        info!("No artists found for '{}'.", name);
        return;
    }

    success!("Found {} artists for '{}'", rows.len(), name);
    println!("{}", Table::new(rows));
}
