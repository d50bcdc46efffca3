use crate::core::config::ApiConfig;
use crate::core::{PropagationResult, RateSnapshot, RateSource, RefreshOutcome, TierRates};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, error, info};

const RATES_PATH: &str = "/api/gold-rates";
const REFRESH_PATH: &str = "/api/gold-rates/refresh";

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: TierRates,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    rates: TierRates,
    updated_at: DateTime<Utc>,
    price_update: PropagationResult,
}

/// Reads and refreshes gold rates through the storefront backend API.
pub struct BackendRateSource {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl BackendRateSource {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("aurum/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
        })
    }

    async fn read_body(response: reqwest::Response, url: &str) -> Result<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text from {url}"))?;

        if !status.is_success() {
            bail!("Request to {url} failed with status {status}: '{body}'");
        }
        if body.trim().is_empty() {
            bail!("Received empty response from {url}");
        }
        Ok(body)
    }

    fn parse<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
        serde_json::from_str(body).map_err(|e| {
            error!(error = ?e, response = %body, "Failed to parse gold rate response");
            anyhow::Error::new(e).context(format!(
                "Failed to parse gold rate response. Response: '{body}'"
            ))
        })
    }
}

#[async_trait]
impl RateSource for BackendRateSource {
    async fn fetch_rates(&self) -> Result<RateSnapshot> {
        let url = format!("{}{}", self.base_url, RATES_PATH);
        debug!("Requesting gold rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;
        let body = Self::read_body(response, &url).await?;

        let payload: RatesResponse = Self::parse(&body)?;
        payload.rates.validate()?;

        debug!(rates = ?payload.rates, "Fetched gold rates");
        Ok(RateSnapshot::new(payload.rates, payload.updated_at))
    }

    async fn refresh_rates(&self) -> Result<RefreshOutcome> {
        let url = format!("{}{}", self.base_url, REFRESH_PATH);
        debug!("Requesting gold rate refresh from {}", url);

        let mut request = self.client.post(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;
        let body = Self::read_body(response, &url).await?;

        let payload: RefreshResponse = Self::parse(&body)?;
        payload.rates.validate()?;

        info!(
            updated = payload.price_update.updated_count,
            errors = payload.price_update.error_count,
            skipped = payload.price_update.skipped_count,
            "Gold rates refreshed"
        );
        Ok(RefreshOutcome {
            snapshot: RateSnapshot::new(payload.rates, payload.updated_at),
            propagation: payload.price_update,
        })
    }
}
