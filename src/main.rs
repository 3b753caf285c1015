use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use spotsearch::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search artists by name
    Artist(ArtistOptions),

    /// Search tracks by name, artist and album
    Track(TrackOptions),

    /// Look up a track by its Spotify ID
    TrackId(TrackIdOptions),

    /// Inspect or clear the local search cache
    Cache(CacheOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone)]
pub struct OutputFlags {
    /// Print the raw results as JSON
    #[clap(long)]
    pub json: bool,

    /// Neither read from nor write to the local cache
    #[clap(long)]
    pub no_cache: bool,

    /// Maximum age of cached results in seconds
    #[clap(long)]
    pub max_age: Option<u64>,

    /// Request timeout in seconds
    #[clap(long)]
    pub timeout: Option<u64>,
}

impl From<OutputFlags> for cli::SearchOptions {
    fn from(flags: OutputFlags) -> Self {
        cli::SearchOptions {
            json: flags.json,
            no_cache: flags.no_cache,
            max_age: flags.max_age,
            timeout: flags.timeout,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistOptions {
    /// Artist name to search for
    pub name: String,

    /// Maximum number of results
    #[clap(long)]
    pub limit: Option<u32>,

    #[command(flatten)]
    pub output: OutputFlags,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOptions {
    /// Track name to search for
    pub name: String,

    /// Artist of the track
    #[clap(long, default_value = "")]
    pub artist: String,

    /// Album of the track
    #[clap(long, default_value = "")]
    pub album: String,

    /// Maximum number of results
    #[clap(long)]
    pub limit: Option<u32>,

    #[command(flatten)]
    pub output: OutputFlags,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackIdOptions {
    /// Spotify track ID
    pub id: String,

    #[command(flatten)]
    pub output: OutputFlags,
}

#[derive(Parser, Debug, Clone)]
pub struct CacheOptions {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheSubcommand {
    /// Show where the cache lives and how many searches it holds
    Info,

    /// Remove all cached searches
    Clear,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Artist(opt) => cli::search_artists(opt.name, opt.limit, opt.output.into()).await,
        Command::Track(opt) => {
            cli::search_tracks(opt.name, opt.artist, opt.album, opt.limit, opt.output.into())
                .await
        }
        Command::TrackId(opt) => cli::lookup_track(opt.id, opt.output.into()).await,
        Command::Cache(opt) => match opt.command {
            CacheSubcommand::Info => cli::cache_info().await,
            CacheSubcommand::Clear => cli::clear_cache().await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
