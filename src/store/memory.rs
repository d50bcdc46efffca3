use super::{SnapshotStore, StoredRates};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory store used for tests and runs without persistence
#[derive(Default)]
pub struct MemorySnapshotStore {
    inner: Mutex<Option<StoredRates>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(entry: StoredRates) -> Self {
        Self {
            inner: Mutex::new(Some(entry)),
        }
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Option<StoredRates>> {
        let entry = self.inner.lock().await.clone();
        if entry.is_some() {
            debug!("Store HIT");
        } else {
            debug!("Store MISS");
        }
        Ok(entry)
    }

    async fn save(&self, entry: &StoredRates) -> Result<()> {
        let mut inner = self.inner.lock().await;
        debug!("Store PUT");
        *inner = Some(entry.clone());
        Ok(())
    }
}
