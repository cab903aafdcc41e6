use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roofarea::{RoofAreaResolver, RoofAreaResolverBuilder, DEFAULT_TIMEOUT_SECS};
use tracing_subscriber::EnvFilter;

mod commands;

/// Roof area lookup CLI tool
#[derive(Parser)]
#[command(name = "roofarea")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Google API key used for geocoding and roof lookups
    #[arg(short = 'k', long, env = "GOOGLE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Geocoding endpoint
    #[arg(long, env = "ROOFAREA_GEOCODE_URL", global = true)]
    geocode_url: Option<String>,

    /// Roof segment endpoint
    #[arg(long, env = "ROOFAREA_ROOF_SEGMENTS_URL", global = true)]
    roof_segments_url: Option<String>,

    /// Timeout for each upstream request, in seconds
    #[arg(
        short,
        long,
        env = "ROOFAREA_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        global = true
    )]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an address to the area of its nearest roof segment
    Lookup {
        /// Postal address, e.g. "1600 Amphitheatre Parkway, Mountain View, CA"
        address: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,

        /// Output the roof outline as a GeoJSON Feature
        #[arg(short, long, conflicts_with = "json")]
        geojson: bool,
    },

    /// Geocode an address without looking up the roof
    Geocode {
        /// Postal address
        address: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },
}

impl Cli {
    fn resolver(&self) -> Result<RoofAreaResolver> {
        let api_key = self
            .api_key
            .clone()
            .context("GOOGLE_API_KEY environment variable not set. Use --api-key or set GOOGLE_API_KEY")?;

        let mut builder = RoofAreaResolverBuilder::new()
            .api_key(api_key)
            .timeout_secs(self.timeout);

        if let Some(url) = &self.geocode_url {
            builder = builder.geocode_url(url);
        }
        if let Some(url) = &self.roof_segments_url {
            builder = builder.roof_segments_url(url);
        }

        builder.build().context("Failed to create roof area resolver")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let resolver = cli.resolver()?;

    match cli.command {
        Commands::Lookup {
            address,
            json,
            geojson,
        } => commands::lookup::run(&resolver, address, json, geojson).await,
        Commands::Geocode { address, json } => commands::geocode::run(&resolver, address, json).await,
    }
}
