use std::time::Duration;

use super::{OverpassError, OverpassResponse};

/// HTTP client for an Overpass API endpoint. queries are posted as form data
/// under the `data` key, the way the public interpreters expect them.
pub struct OverpassClient {
    url: String,
    client: reqwest::Client,
}

impl OverpassClient {
    pub fn new(url: &str, timeout: Duration) -> Result<OverpassClient, OverpassError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("xmin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OverpassError::BuildError(e.to_string()))?;
        Ok(OverpassClient {
            url: String::from(url),
            client,
        })
    }

    pub async fn fetch(&self, query: &str) -> Result<OverpassResponse, OverpassError> {
        let response = self
            .client
            .post(&self.url)
            .form(&[("data", query)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(OverpassError::StatusError(response.status().as_u16()));
        }
        response
            .json::<OverpassResponse>()
            .await
            .map_err(|e| OverpassError::DecodeError(e.to_string()))
    }
}
