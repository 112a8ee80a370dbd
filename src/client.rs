use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::{ModelInfo, ProviderSettings};
use crate::provider::api_for;

/// Client-side timeout for probes and model listings.
pub const LISTING_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP transport for the configured model server.
///
/// Completion calls carry no client-side timeout: they block until the
/// provider answers or the connection fails. Probes and listings go through a
/// second client bounded by [`LISTING_TIMEOUT`] so an unreachable host is
/// reported quickly.
#[derive(Clone)]
pub struct ProviderClient {
    client: reqwest::Client,
    listing_client: reqwest::Client,
}

impl ProviderClient {
    pub fn new() -> Self {
        Self::with_listing_timeout(LISTING_TIMEOUT)
    }

    pub fn with_listing_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder().build().unwrap_or_default(),
            listing_client: reqwest::Client::builder()
                .connect_timeout(timeout)
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Sends `prompt` as the only user turn and returns the assistant text.
    pub async fn complete(
        &self,
        settings: &ProviderSettings,
        prompt: &str,
    ) -> Result<String, AppError> {
        let api = api_for(settings.provider);
        let request = api.build_completion_request(&settings.base_url, &settings.model, prompt)?;
        debug!(provider = %settings.provider, url = %request.url, "sending completion request");

        let response = self
            .client
            .post(&request.url)
            .json(&request.body)
            .send()
            .await
            .map_err(|source| AppError::ProviderUnreachable { url: request.url.clone(), source })?;

        let body = read_json(response, &request.url).await?;
        Ok(api.parse_completion_response(&body))
    }

    /// Lightweight reachability check against the model-listing endpoint.
    pub async fn probe(&self, settings: &ProviderSettings) -> Result<(), AppError> {
        let url = api_for(settings.provider).listing_url(&settings.base_url);
        debug!(provider = %settings.provider, %url, "probing provider");
        let response = self.get_listing(&url).await?;
        check_status(&response, &url)
    }

    pub async fn list_models(
        &self,
        settings: &ProviderSettings,
    ) -> Result<Vec<ModelInfo>, AppError> {
        let api = api_for(settings.provider);
        let url = api.listing_url(&settings.base_url);
        debug!(provider = %settings.provider, %url, "fetching model list");
        let response = self.get_listing(&url).await?;
        let body = read_json(response, &url).await?;
        Ok(api.parse_model_listing(&body))
    }

    async fn get_listing(&self, url: &str) -> Result<reqwest::Response, AppError> {
        self.listing_client
            .get(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|source| AppError::ProviderUnreachable { url: url.to_string(), source })
    }
}

impl Default for ProviderClient {
    fn default() -> Self {
        Self::new()
    }
}

fn check_status(response: &reqwest::Response, url: &str) -> Result<(), AppError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(AppError::ProviderStatus { url: url.to_string(), status: status.as_u16() })
    }
}

async fn read_json(response: reqwest::Response, url: &str) -> Result<Value, AppError> {
    if let Err(err) = check_status(&response, url) {
        let body = response.text().await.unwrap_or_default();
        warn!("{err}: {body}");
        return Err(err);
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| AppError::parse(format!("{url}: {e}")))
}
