//! Spotify Search Client Library
//!
//! This library wraps the search endpoints of the Spotify Web API. It offers
//! artist search, track search by metadata and track lookup by identifier,
//! with a configurable request timeout and an optional host-supplied cache.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Cache capability and the bundled cache implementations
//! - `spotify` - Spotify Web API search client
//! - `types` - Data structures and type definitions
//! - `utils` - Query and cache-key helpers
//!
//! # Example
//!
//! ```
//! use spotsearch::spotify::SpotifySearch;
//!
//! #[tokio::main]
//! async fn main() -> spotsearch::Res<()> {
//!     let artists = SpotifySearch::shared()
//!         .search_artist("Radiohead", Some(5))
//!         .await?;
//!     println!("{} artists", artists.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod management;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI glue where several unrelated error types meet. The
/// library operations themselves return [`spotify::SearchError`].
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Searching for {}...", name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for the command-line binary. Library code reports failures
/// through `Result` values and never calls this.
///
/// # Example
///
/// ```
/// error!("Search failed: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Cache file not found, starting with an empty cache");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
