//! Rate source abstractions

use super::rate::RateSnapshot;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Summary of the backend's product price recalculation after a rate refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationResult {
    pub success: bool,
    #[serde(default)]
    pub updated_count: u64,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default)]
    pub skipped_count: u64,
    #[serde(default)]
    pub errors: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub snapshot: RateSnapshot,
    pub propagation: PropagationResult,
}

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Reads the latest published rates.
    async fn fetch_rates(&self) -> Result<RateSnapshot>;

    /// Asks the backend to refresh rates and recompute product prices.
    async fn refresh_rates(&self) -> Result<RefreshOutcome>;
}
