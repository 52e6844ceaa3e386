#[derive(Debug, thiserror::Error)]
pub enum TerraceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {path} returned status {status}")]
    Server { path: String, status: u16 },
    #[error("response from {path} carried no data")]
    MissingPayload { path: String },
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),
}

pub type TerraceResult<T> = std::result::Result<T, TerraceError>;
