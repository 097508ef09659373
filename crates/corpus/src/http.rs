//! GET helper shared by the remote sources.

use std::time::Duration;

use reqwest::StatusCode;

use crate::error::SourceError;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Client with the default 30 second request timeout.
pub(crate) fn default_client(url: &str) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(DEFAULT_FETCH_TIMEOUT)
        .build()
        .map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })
}

/// Body of a `200 OK` response. Any other status is [`SourceError::Status`].
pub(crate) async fn fetch(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, SourceError> {
    let http_err = |source| SourceError::Http {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(http_err)?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(http_err)?;
    Ok(body.to_vec())
}
