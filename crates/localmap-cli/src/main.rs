use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use localmap_api::StoreClient;
use localmap_core::config::load_app_config;
use localmap_core::geo::LatLngBounds;
use localmap_core::store::Store;

#[derive(Debug, Parser)]
#[command(name = "localmap-cli")]
#[command(about = "Query the store-locator backend from the command line")]
struct Cli {
    /// Print raw JSON instead of one line per record.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Stores within a radius of a point.
    Nearby {
        lat: f64,
        lng: f64,
        /// Radius in meters.
        #[arg(long, default_value_t = 3000)]
        distance: u32,
    },
    /// Stores inside a lat/lng rectangle.
    Rect {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
        /// Fetch marker projections instead of full records.
        #[arg(long)]
        markers: bool,
    },
    /// Name search (paginated).
    SearchName {
        query: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
    /// Region search (paginated).
    SearchRegion {
        query: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
    /// Full detail for one store by key.
    Detail { key: String },
    /// List issuing institutions and their anchor coordinates.
    Institutions,
}

fn print_stores(stores: &[Store], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stores)?);
        return Ok(());
    }
    for store in stores {
        println!(
            "{}  {}  ({:.5}, {:.5})  {}",
            store.key, store.name, store.latitude, store.longitude, store.address
        );
    }
    tracing::info!(count = stores.len(), "fetched stores");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    let client = StoreClient::new(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    match cli.command {
        Commands::Nearby { lat, lng, distance } => {
            let stores = client.nearby_by_point(lat, lng, distance).await?;
            print_stores(&stores, cli.json)?;
        }
        Commands::Rect {
            south,
            west,
            north,
            east,
            markers,
        } => {
            let bounds = LatLngBounds::new(south, west, north, east);
            if markers {
                let markers = client.markers_by_rect(&bounds).await?;
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&markers)?);
                } else {
                    for marker in &markers {
                        println!(
                            "{}  ({:.5}, {:.5})",
                            marker.key, marker.latitude, marker.longitude
                        );
                    }
                }
            } else {
                let stores = client.nearby_by_rect(&bounds).await?;
                print_stores(&stores, cli.json)?;
            }
        }
        Commands::SearchName { query, page, size } => {
            let stores = client.search_by_name(&query, page, size).await?;
            print_stores(&stores, cli.json)?;
        }
        Commands::SearchRegion { query, page, size } => {
            let stores = client.search_by_region(&query, page, size).await?;
            print_stores(&stores, cli.json)?;
        }
        Commands::Detail { key } => {
            let store = client.store_detail(&key).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&store)?);
            } else {
                println!("{}  {}", store.key, store.name);
                println!("  address: {}", store.address);
                println!("  region:  {} ({})", store.region, store.local_bill);
                if let Some(sector) = &store.sector {
                    println!("  sector:  {sector}");
                }
                if let Some(phone) = &store.phone {
                    println!("  phone:   {phone}");
                }
                println!("  coords:  ({:.5}, {:.5})", store.latitude, store.longitude);
            }
        }
        Commands::Institutions => {
            let institutions = client.institutions().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&institutions)?);
            } else {
                for institution in &institutions {
                    println!(
                        "{}  ({:.5}, {:.5})",
                        institution.region_name, institution.latitude, institution.longitude
                    );
                }
            }
        }
    }

    Ok(())
}
