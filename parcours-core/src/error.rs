use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed floor-plan geometry: {0}")]
    MalformedGeometry(String),
    #[error("No candidate artworks match the request")]
    NoCandidates,
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
