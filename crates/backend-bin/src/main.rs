//! `saberprod` — the SaberPro auth backend binary.

use clap::Parser;
use saberpro_backend_lib::{
    config::Settings, router, store::FlatFileIdentityStore, AppState,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "saberprod", about = "SaberPro authentication backend")]
struct Args {
    /// Path to a config file (defaults to saberpro.toml, then
    /// config/default.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Override the data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load().or_else(|_| Settings::load_from("config/default.toml"))?,
    };
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }
    if let Some(data_dir) = args.data_dir {
        settings.data_dir = data_dir;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    let store = FlatFileIdentityStore::new(&settings.data_dir)?;
    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState::new(store, settings));
    let app = router::create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on {bind_addr}");

    // Connect info feeds the per-client auth lockout when no reverse proxy
    // sets x-real-ip.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
