use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// GTOPO30 terrain elevation CLI tool
#[derive(Parser)]
#[command(name = "demcache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing .DEM tile files
    #[arg(short, long, env = "DEM_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Side of the window buffer in samples
    #[arg(short, long, default_value = "600", global = true)]
    window_size: u32,

    /// Look-ahead horizon in nautical miles for reload decisions
    #[arg(long, default_value = "30", global = true)]
    horizon: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query terrain elevation for a single coordinate
    Query {
        /// Latitude in decimal degrees
        #[arg(long)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long)]
        lon: f64,

        /// MSL altitude in meters; also reports height above ground
        #[arg(short, long)]
        alt: Option<f64>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Display information about a DEM tile
    Info {
        /// Tile name (e.g. E100S10), omit when using --lat/--lon
        tile: Option<String>,

        /// Specify the tile by latitude instead of name
        #[arg(long, requires = "lon", conflicts_with = "tile")]
        lat: Option<f64>,

        /// Specify the tile by longitude instead of name
        #[arg(long, requires = "lat", conflicts_with = "tile")]
        lon: Option<f64>,
    },

    /// List available DEM tiles
    List,

    /// Replay a flight track CSV through the cache
    Track {
        /// Input CSV with latitude/longitude columns
        input: PathBuf,

        /// Output CSV (defaults to <input>_terrain.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,

        /// Column name for MSL altitude in meters (optional)
        #[arg(long, default_value = "alt")]
        alt_col: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            lat,
            lon,
            alt,
            json,
        } => commands::query::run(
            cli.data_dir,
            cli.window_size,
            cli.horizon,
            lat,
            lon,
            alt,
            json,
        ),
        Commands::Info { tile, lat, lon } => commands::info::run(cli.data_dir, tile, lat, lon),
        Commands::List => commands::list::run(cli.data_dir),
        Commands::Track {
            input,
            output,
            lat_col,
            lon_col,
            alt_col,
        } => commands::track::run(
            cli.data_dir,
            cli.window_size,
            cli.horizon,
            input,
            output,
            lat_col,
            lon_col,
            alt_col,
        ),
    }
}
