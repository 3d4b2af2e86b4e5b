use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("node returned http status {status}")]
    Status { status: u16 },

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("{method} returned no result")]
    MissingResult { method: String },

    #[error("malformed {method} result: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}
