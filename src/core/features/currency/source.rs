use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::types::RatesApiResponse;
use crate::shared::error::{ConverterError, ConverterResult};
use crate::shared::settings::CurrencySettings;

/// Where live exchange rates come from.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> ConverterResult<RatesApiResponse>;
}

/// Single GET against a JSON endpoint shaped like `{"rates": {...}}`.
///
/// No auth, no retries and no timeout beyond what reqwest applies.
pub struct HttpRateSource {
    http: Client,
    url: String,
}

impl HttpRateSource {
    pub fn new(settings: &CurrencySettings) -> ConverterResult<Self> {
        let http = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| ConverterError::Network(e.to_string()))?;

        Ok(Self::with_client(http, settings.rates_url.clone()))
    }

    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rates(&self) -> ConverterResult<RatesApiResponse> {
        info!("Fetching exchange rates from {}", self.url);
        let resp = self.http.get(&self.url).send().await?;

        if !resp.status().is_success() {
            return Err(ConverterError::Network(format!(
                "Failed to fetch rates: {}",
                resp.status()
            )));
        }

        let payload: RatesApiResponse = resp
            .json()
            .await
            .map_err(|e| ConverterError::Malformed(format!("Invalid response: {}", e)))?;

        debug!("Received {} rates", payload.rates.len());
        Ok(payload)
    }
}
