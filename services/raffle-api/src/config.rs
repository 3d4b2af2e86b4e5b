use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Raffle API settings. Every flag can also come from the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "raffle-api", version, about = "Off-chain API for Rooch red envelopes and raffle boxes")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "RAFFLE_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// JSON-RPC endpoint of the Rooch node
    #[arg(long, env = "ROOCH_RPC_URL", default_value = "https://test-seed.rooch.network")]
    pub rpc_url: String,

    /// Attributes database (postgres:// in production, sqlite:// locally)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://raffle.db?mode=rwc")]
    pub database_url: String,

    /// Directory uploaded images are written to
    #[arg(long, env = "IMAGE_DIR", default_value = "./images")]
    pub image_dir: PathBuf,

    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Address of the published envelope/raffle Move package
    #[arg(long, env = "RAFFLE_PACKAGE")]
    pub package: String,
}
