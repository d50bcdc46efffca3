use super::{SnapshotStore, StoredRates};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "gold_rates";
const ENTRY_KEY: &[u8] = b"latest";

/// Persists the latest rates in a fjall partition under the data directory.
pub struct DiskSnapshotStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskSnapshotStore {
    pub fn open(data_path: &Path) -> Result<Self> {
        let cache_dir = data_path.join("cache");
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create directory: {}", cache_dir.display()))?;

        let keyspace = fjall::Config::new(&cache_dir)
            .open()
            .with_context(|| format!("Failed to open keyspace at {}", cache_dir.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open rate partition")?;
        debug!("Opened rate store at {}", cache_dir.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl SnapshotStore for DiskSnapshotStore {
    async fn load(&self) -> Result<Option<StoredRates>> {
        let Some(value) = self
            .partition
            .get(ENTRY_KEY)
            .context("Failed to read stored rates")?
        else {
            debug!("Store MISS");
            return Ok(None);
        };

        let entry: StoredRates =
            serde_json::from_slice(&value).context("Failed to decode stored rates")?;
        debug!("Store HIT, stored at {}", entry.stored_at);
        Ok(Some(entry))
    }

    async fn save(&self, entry: &StoredRates) -> Result<()> {
        let value = serde_json::to_vec(entry).context("Failed to encode rates")?;
        self.partition
            .insert(ENTRY_KEY, value)
            .context("Failed to write stored rates")?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist stored rates")?;
        debug!("Store PUT, stored at {}", entry.stored_at);
        Ok(())
    }
}
