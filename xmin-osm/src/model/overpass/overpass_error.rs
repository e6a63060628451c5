use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverpassError {
    #[error("failure building overpass client: {0}")]
    BuildError(String),
    #[error("overpass transport failure: {source}")]
    TransportError {
        #[from]
        source: reqwest::Error,
    },
    #[error("overpass returned status {0}")]
    StatusError(u16),
    #[error("failure decoding overpass response: {0}")]
    DecodeError(String),
}
