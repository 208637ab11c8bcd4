mod app;
mod output;

use clap::{Args, Parser, Subcommand};
use storemap_core::{GeoCoordinate, ViewportRect};
use storemap_directory::StoreFilter;
use storemap_geo::{ChromeInsets, MapViewport};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storemap-cli")]
#[command(about = "Find local-currency stores on a map")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load every store and print the resolved list
    Load {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print the category options offered by the current store list
    Categories,
    /// Print the stores visible in a map viewport
    Visible {
        #[command(flatten)]
        viewport: ViewportArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Resolve one address through the cache, then the geocoder
    Resolve {
        /// Free-text address
        address: String,
    },
    /// Print where the map should move to show the user's location
    Focus {
        /// User latitude; omit to simulate a device without location support
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        /// User longitude
        #[arg(long, allow_negative_numbers = true)]
        lng: Option<f64>,
        #[command(flatten)]
        viewport: OptionalViewportArgs,
    },
}

#[derive(Debug, Clone, Default, Args)]
struct FilterArgs {
    /// Case-insensitive substring of the store name
    #[arg(long)]
    name: Option<String>,
    /// Exact category
    #[arg(long)]
    category: Option<String>,
}

impl FilterArgs {
    fn into_filter(self) -> StoreFilter {
        StoreFilter::new(self.name, self.category)
    }
}

/// Raw map bounds plus the chrome drawn over the map.
#[derive(Debug, Clone, Args)]
struct ViewportArgs {
    #[arg(long, allow_negative_numbers = true)]
    north: f64,
    #[arg(long, allow_negative_numbers = true)]
    south: f64,
    #[arg(long, allow_negative_numbers = true)]
    east: f64,
    #[arg(long, allow_negative_numbers = true)]
    west: f64,
    /// Map height in pixels
    #[arg(long)]
    height_px: f64,
    /// Height of the top bar in pixels
    #[arg(long, default_value_t = 0.0)]
    top_px: f64,
    /// Height of the bottom sheet in pixels
    #[arg(long, default_value_t = 0.0)]
    bottom_px: f64,
}

impl ViewportArgs {
    fn map_viewport(&self) -> MapViewport {
        let bounds = ViewportRect::from_edges(self.north, self.south, self.east, self.west);
        MapViewport {
            bounds,
            center: bounds.center(),
            height_px: self.height_px,
        }
    }

    fn chrome(&self) -> ChromeInsets {
        ChromeInsets {
            top_px: self.top_px,
            bottom_px: self.bottom_px,
        }
    }
}

/// Same as [`ViewportArgs`] but every field may be left out.
#[derive(Debug, Clone, Default, Args)]
struct OptionalViewportArgs {
    #[arg(long, allow_negative_numbers = true)]
    north: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    south: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    east: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    west: Option<f64>,
    #[arg(long)]
    height_px: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    top_px: f64,
    #[arg(long, default_value_t = 0.0)]
    bottom_px: f64,
}

impl OptionalViewportArgs {
    /// `None` unless all four edges and the height were given.
    fn complete(&self) -> Option<ViewportArgs> {
        Some(ViewportArgs {
            north: self.north?,
            south: self.south?,
            east: self.east?,
            west: self.west?,
            height_px: self.height_px?,
            top_px: self.top_px,
            bottom_px: self.bottom_px,
        })
    }
}

fn user_position(lat: Option<f64>, lng: Option<f64>) -> Option<GeoCoordinate> {
    lat.zip(lng).map(|(lat, lng)| GeoCoordinate::new(lat, lng))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = storemap_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::Load { filter } => {
            let directory = app::build_directory(&config)?;
            app::run_load(&directory, &filter.into_filter()).await;
        }
        Commands::Categories => {
            let directory = app::build_directory(&config)?;
            app::run_categories(&directory).await;
        }
        Commands::Visible { viewport, filter } => {
            let directory = app::build_directory(&config)?;
            app::run_visible(&directory, &viewport, &filter.into_filter()).await;
        }
        Commands::Resolve { address } => {
            let directory = app::build_directory(&config)?;
            app::run_resolve(directory.batcher(), &address).await?;
        }
        Commands::Focus { lat, lng, viewport } => {
            app::run_focus(user_position(lat, lng), viewport.complete().as_ref()).await;
        }
    }

    Ok(())
}
