//! tuneful-api - song and upload HTTP service
//!
//! `tuneful-api [serve]` runs the server, `tuneful-api seed` inserts a sample
//! song and exits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tuneful_api::{build_router, AppState};
use tuneful_common::config::{load_toml_config, resolve_root_folder, RootFolder};
use tuneful_common::db::{self, songs};
use tuneful_common::BlobStore;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Command-line arguments for tuneful-api
#[derive(Parser, Debug)]
#[command(name = "tuneful-api")]
#[command(about = "Song and upload HTTP service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "TUNEFUL_CONFIG")]
    config: Option<PathBuf>,

    /// Folder holding the database and uploads
    #[arg(short, long, env = "TUNEFUL_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "TUNEFUL_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Insert a sample song and exit
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The configured level only applies when RUST_LOG is unset
    let loaded = load_toml_config(args.config.as_deref());
    let level = loaded
        .as_ref()
        .map(|(config, _)| config.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tuneful_api={0},tuneful_common={0},tower_http={0}", level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting tuneful-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let (toml_config, config_source) = loaded.context("Failed to load configuration")?;
    config_source.log();

    let root = RootFolder::new(resolve_root_folder(args.root_folder.as_deref(), &toml_config));
    root.ensure_directory_exists()
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", root.path().display());

    let db_path = root.database_path();
    info!("Database: {}", db_path.display());
    let pool = db::init_database_pool(&db_path)
        .await
        .context("Failed to open database")?;

    if args.command == Some(Command::Seed) {
        let song = songs::create_song(&pool, "beyonce.mp3").await?;
        info!("Seeded song {} ({})", song.id, song.file.filename);
        return Ok(());
    }

    let blobs = BlobStore::new(root.upload_path(&toml_config));
    blobs
        .ensure_root()
        .await
        .context("Failed to create upload folder")?;
    info!("Upload folder: {}", blobs.root().display());

    let state = AppState::new(pool, blobs)
        .with_public_url(toml_config.public_url.clone())
        .with_max_upload_bytes(toml_config.max_upload_bytes);
    let app = build_router(state);

    let host = args
        .host
        .or(toml_config.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("tuneful-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("tuneful-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
