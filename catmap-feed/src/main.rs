mod config;

use anyhow::Context;
use catmap::{
    feed::{LocationPublisher, LocationStore, MarkerInput, RestStore, RestaurantSync, ZomatoClient},
    prelude::Arc,
    LatLng,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the device location for the sync side to pick up
    Publish {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(short, long, value_name = "FILE", default_value = "catmap.toml")]
        config: PathBuf,
    },
    /// Watch the stored location and fan nearby restaurants out to the store
    Sync {
        /// Process the current location only, then exit
        #[arg(long)]
        once: bool,
        #[arg(short, long, value_name = "FILE", default_value = "catmap.toml")]
        config: PathBuf,
    },
}

/// Marker inputs go to stdout as JSON lines for the map side to consume.
fn emit(inputs: &[MarkerInput]) -> anyhow::Result<()> {
    for input in inputs {
        println!("{}", serde_json::to_string(input)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Publish { lat, lng, config } => {
            let feed = config::load_from_file(&config)?;
            let store: Arc<dyn LocationStore> = Arc::new(
                RestStore::new(feed.store, feed.retry).context("Failed to open location store")?,
            );

            LocationPublisher::new(store)
                .publish(LatLng::new(lat, lng))
                .await
                .context("Failed to publish location")?;
        }
        Commands::Sync { once, config } => {
            let feed = config::load_from_file(&config)?;
            let store: Arc<dyn LocationStore> = Arc::new(
                RestStore::new(feed.store, feed.retry.clone())
                    .context("Failed to open location store")?,
            );
            let source = Arc::new(ZomatoClient::new(feed.search, feed.retry));
            let sync = RestaurantSync::new(store, source);

            if once {
                let inputs = sync.sync_current().await.context("Restaurant sync failed")?;
                emit(&inputs)?;
                return Ok(());
            }

            let (handle, mut batches) = sync.spawn();
            loop {
                tokio::select! {
                    batch = batches.recv() => match batch {
                        Some(inputs) => emit(&inputs)?,
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => {
                        log::info!("interrupted, stopping sync");
                        handle.cancel();
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
