//! Secondary storage for the last successfully fetched rates

pub mod disk;
pub mod memory;

use crate::core::rate::TierRates;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use disk::DiskSnapshotStore;
pub use memory::MemorySnapshotStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRates {
    pub rates: TierRates,
    pub updated_at: DateTime<Utc>,
    pub stored_at: DateTime<Utc>,
}

/// A single-entry store that outlives the process.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self) -> Result<Option<StoredRates>>;
    async fn save(&self, entry: &StoredRates) -> Result<()>;
}
