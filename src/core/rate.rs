//! Gold rate types shared by the cache, providers and CLI

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum PurityTier {
    K24,
    K22,
    K18,
    K14,
}

impl PurityTier {
    pub const ALL: [PurityTier; 4] = [
        PurityTier::K24,
        PurityTier::K22,
        PurityTier::K18,
        PurityTier::K14,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PurityTier::K24 => "24k",
            PurityTier::K22 => "22k",
            PurityTier::K18 => "18k",
            PurityTier::K14 => "14k",
        }
    }
}

impl Display for PurityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for PurityTier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().trim_end_matches('k') {
            "24" => Ok(PurityTier::K24),
            "22" => Ok(PurityTier::K22),
            "18" => Ok(PurityTier::K18),
            "14" => Ok(PurityTier::K14),
            _ => Err(anyhow!("Invalid purity tier: {}", s)),
        }
    }
}

/// Price per gram for every recognized purity tier.
///
/// Serialized as a JSON object keyed by tier label, e.g. `{"24k": 6500.0, ...}`.
/// A payload missing any of the four keys fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TierRates {
    #[serde(rename = "24k")]
    pub k24: f64,
    #[serde(rename = "22k")]
    pub k22: f64,
    #[serde(rename = "18k")]
    pub k18: f64,
    #[serde(rename = "14k")]
    pub k14: f64,
}

impl TierRates {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, tier: PurityTier) -> f64 {
        match tier {
            PurityTier::K24 => self.k24,
            PurityTier::K22 => self.k22,
            PurityTier::K18 => self.k18,
            PurityTier::K14 => self.k14,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PurityTier, f64)> + '_ {
        PurityTier::ALL.into_iter().map(|tier| (tier, self.get(tier)))
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, rate)| rate == 0.0)
    }

    /// Rejects negative, NaN and infinite rates.
    pub fn validate(&self) -> Result<()> {
        for (tier, rate) in self.iter() {
            if !rate.is_finite() || rate < 0.0 {
                bail!("Invalid rate for {}: {}", tier, rate);
            }
        }
        Ok(())
    }
}

/// One fetched set of per-purity rates plus the time the data was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub rates: TierRates,
    pub fetched_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl RateSnapshot {
    pub fn new(rates: TierRates, fetched_at: DateTime<Utc>) -> Self {
        Self {
            rates,
            fetched_at,
            fetch_error: None,
        }
    }

    /// All-zero snapshot returned when neither the network nor storage has data.
    pub fn unavailable(now: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            rates: TierRates::zero(),
            fetched_at: now,
            fetch_error: Some(message.into()),
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.fetch_error = Some(message.into());
        self
    }

    pub fn has_error(&self) -> bool {
        self.fetch_error.is_some()
    }
}
