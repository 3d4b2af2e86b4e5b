use clap::Parser;
use raffle_api::{router, AppState, Config};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = Config::parse();
    let state = AppState::connect(&config).await?;
    tracing::info!(
        rpc = %config.rpc_url,
        images = %config.image_dir.display(),
        package = %config.package,
        "state ready"
    );

    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "raffle api listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
