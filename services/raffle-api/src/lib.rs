pub mod config;
pub mod error;
pub mod execute;
pub mod msg;
pub mod query;
pub mod server;
pub mod state;
pub mod storage;

pub use config::Config;
pub use error::ApiError;
pub use server::router;
pub use state::AppState;
