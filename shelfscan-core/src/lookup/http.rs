//! Shared HTTP plumbing for metadata sources

use crate::error::LookupError;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!(
    "shelfscan/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/your-org/shelfscan)"
);

/// Build the client used by every source
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, LookupError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| LookupError::Network(e.to_string()))
}

/// GET `url` and decode the JSON body
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, LookupError> {
    tracing::debug!(url = %url, "Querying metadata service");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LookupError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(LookupError::Api(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| LookupError::Parse(e.to_string()))
}
