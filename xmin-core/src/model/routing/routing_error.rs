use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("failure building routing engine client: {0}")]
    BuildError(String),
    #[error("routing engine transport failure: {source}")]
    TransportError {
        #[from]
        source: reqwest::Error,
    },
    #[error("routing engine returned status {0}")]
    StatusError(u16),
    #[error("failure decoding routing engine response: {0}")]
    DecodeError(String),
    #[error("routing engine returned unsupported isochrone geometry: {0}")]
    UnsupportedGeometry(String),
    #[error("fixed routing engine has no isochrone configured")]
    NoFixedIsochrone,
}
