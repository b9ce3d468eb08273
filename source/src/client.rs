use crate::adapter::AdapterError;

use backon::{ExponentialBuilder, Retryable};
use url::Url;

use std::{sync::LazyLock, time::Duration};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_RETRIES: usize = 3;

static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|err| {
            log::warn!("Falling back to a default HTTP client: {err}");
            reqwest::Client::new()
        })
});

/// GETs `url` and returns the body, retrying transient failures with
/// exponential backoff.
pub async fn http_request(url: &Url) -> Result<String, AdapterError> {
    let backoff = ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(250))
        .with_max_times(MAX_RETRIES);

    (|| get_text(url))
        .retry(backoff)
        .when(AdapterError::is_transient)
        .notify(|err, wait| log::warn!("Request to {url} failed ({err}), retrying in {wait:?}"))
        .await
}

async fn get_text(url: &Url) -> Result<String, AdapterError> {
    let response = HTTP_CLIENT
        .get(url.clone())
        .send()
        .await
        .map_err(AdapterError::FetchError)?;

    let status = response.status();
    if !status.is_success() {
        return Err(AdapterError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    response.text().await.map_err(AdapterError::FetchError)
}
