pub mod cli;
pub mod core;
pub mod providers;
pub mod rate_cache;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{PurityTier, SystemClock};
use crate::providers::BackendRateSource;
use crate::rate_cache::{CachePolicy, RateCache};
use crate::store::{DiskSnapshotStore, MemorySnapshotStore, SnapshotStore};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Rates { force: bool, persist: bool },
    Refresh,
    Quote { tier: PurityTier, grams: f64 },
    Watch { every: Duration, count: Option<u64> },
}

impl AppCommand {
    fn persist(&self) -> bool {
        match self {
            AppCommand::Rates { persist, .. } => *persist,
            _ => true,
        }
    }
}

fn open_store(config: &AppConfig, persist: bool) -> Arc<dyn SnapshotStore> {
    if !persist {
        debug!("Persistence disabled, using in-memory rate store");
        return Arc::new(MemorySnapshotStore::new());
    }

    let opened = config
        .default_data_path()
        .and_then(|path| DiskSnapshotStore::open(&path));
    match opened {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Offline rate store unavailable, continuing without it: {e:#}");
            Arc::new(MemorySnapshotStore::new())
        }
    }
}

/// Builds the rate cache from configuration.
pub fn build_cache(config: &AppConfig, persist: bool) -> Result<RateCache> {
    let policy = CachePolicy::try_from(&config.cache)?;
    let source = Arc::new(BackendRateSource::new(&config.api)?);
    let store = open_store(config, persist);
    Ok(RateCache::new(source, store, Arc::new(SystemClock), policy))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Aurum starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let cache = build_cache(&config, command.persist())?;

    match command {
        AppCommand::Rates { force, .. } => cli::rates::display_rates(&cache, force).await,
        AppCommand::Refresh => cli::refresh::refresh_rates(&cache).await,
        AppCommand::Quote { tier, grams } => cli::quote::display_quote(&cache, tier, grams).await,
        AppCommand::Watch { every, count } => cli::watch::watch_rates(&cache, every, count).await,
    }
}
