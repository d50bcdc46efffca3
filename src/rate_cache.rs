//! Time-gated gold rate cache with offline fallback.
//!
//! The passive read path ([`RateCache::get`]) never fails: when the network is
//! unavailable it degrades to the in-memory snapshot, then to the copy kept in
//! secondary storage, and finally to an all-zero snapshot. Every degraded
//! result carries a `fetch_error` describing what the caller is looking at.
//!
//! The state lock is held for the duration of a fetch, so concurrent callers
//! never issue overlapping requests. A caller that waited on the lock sees the
//! result of the fetch that completed before it.

use crate::core::config::CacheConfig;
use crate::core::{Clock, RateSnapshot, RateSource, RefreshOutcome};
use crate::store::{SnapshotStore, StoredRates};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const UNAVAILABLE_MESSAGE: &str = "Gold rates are currently unavailable. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub refresh_interval: Duration,
    pub max_retry_attempts: u32,
    pub offline_max_age: Duration,
    pub retry_inside_window: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::hours(12),
            max_retry_attempts: 3,
            offline_max_age: Duration::days(7),
            retry_inside_window: true,
        }
    }
}

impl TryFrom<&CacheConfig> for CachePolicy {
    type Error = anyhow::Error;

    fn try_from(config: &CacheConfig) -> Result<Self> {
        let refresh_interval = i64::try_from(config.refresh_interval_hours)
            .ok()
            .and_then(Duration::try_hours)
            .with_context(|| {
                format!(
                    "cache.refresh_interval_hours is out of range: {}",
                    config.refresh_interval_hours
                )
            })?;
        let offline_max_age = i64::try_from(config.offline_max_age_days)
            .ok()
            .and_then(Duration::try_days)
            .with_context(|| {
                format!(
                    "cache.offline_max_age_days is out of range: {}",
                    config.offline_max_age_days
                )
            })?;

        Ok(Self {
            refresh_interval,
            max_retry_attempts: config.max_retry_attempts,
            offline_max_age,
            retry_inside_window: config.retry_inside_window,
        })
    }
}

/// Kind of snapshot the cache most recently handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Empty,
    Fresh,
    StaleWithError,
    FallbackWithError,
    ErrorSentinel,
}

#[derive(Debug)]
struct CacheState {
    snapshot: Option<RateSnapshot>,
    last_fetch: Option<DateTime<Utc>>,
    retry_count: u32,
    status: CacheStatus,
}

pub struct RateCache {
    source: Arc<dyn RateSource>,
    store: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    state: Mutex<CacheState>,
}

impl RateCache {
    pub fn new(
        source: Arc<dyn RateSource>,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            source,
            store,
            clock,
            policy,
            state: Mutex::new(CacheState {
                snapshot: None,
                last_fetch: None,
                retry_count: 0,
                status: CacheStatus::Empty,
            }),
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub async fn snapshot(&self) -> Option<RateSnapshot> {
        self.state.lock().await.snapshot.clone()
    }

    pub async fn retry_count(&self) -> u32 {
        self.state.lock().await.retry_count
    }

    pub async fn status(&self) -> CacheStatus {
        self.state.lock().await.status
    }

    /// Returns the best rates available right now, fetching when the gate allows.
    pub async fn get(&self, force_refresh: bool) -> RateSnapshot {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        if !self.should_fetch(&state, force_refresh, now) {
            debug!(retry_count = state.retry_count, "Serving cached gold rates");
            if let Some(snapshot) = state.snapshot.clone() {
                state.status = CacheStatus::Fresh;
                return snapshot;
            }
            return self.offline_or_unavailable(&mut state, now).await;
        }

        state.last_fetch = Some(now);
        match self.source.fetch_rates().await {
            Ok(snapshot) => self.accept(&mut state, snapshot, now).await,
            Err(e) => {
                state.retry_count += 1;
                warn!(
                    attempt = state.retry_count,
                    "Failed to fetch gold rates: {e:#}"
                );

                if let Some(cached) = &state.snapshot {
                    let message = format!(
                        "Failed to fetch latest rates ({} failed attempt{}). Showing cached rates.",
                        state.retry_count,
                        if state.retry_count == 1 { "" } else { "s" }
                    );
                    let stale = cached.clone().with_error(message);
                    state.status = CacheStatus::StaleWithError;
                    return stale;
                }
                self.offline_or_unavailable(&mut state, now).await
            }
        }
    }

    /// Refreshes rates through the privileged endpoint and triggers price
    /// propagation. Unlike [`RateCache::get`] a failure is returned to the caller.
    pub async fn force_refresh_and_propagate(&self) -> Result<RefreshOutcome> {
        let mut state = self.state.lock().await;

        let outcome = self
            .source
            .refresh_rates()
            .await
            .context("Failed to refresh gold rates")?;

        let now = self.clock.now();
        state.last_fetch = Some(now);
        let snapshot = self.accept(&mut state, outcome.snapshot, now).await;
        info!(
            updated = outcome.propagation.updated_count,
            "Gold rates refreshed and propagated"
        );
        Ok(RefreshOutcome {
            snapshot,
            propagation: outcome.propagation,
        })
    }

    fn should_fetch(&self, state: &CacheState, force_refresh: bool, now: DateTime<Utc>) -> bool {
        if force_refresh || state.snapshot.is_none() {
            return true;
        }
        let window_elapsed = state
            .last_fetch
            .is_none_or(|last| now - last >= self.policy.refresh_interval);
        let retries_left = state.retry_count < self.policy.max_retry_attempts;

        window_elapsed || (self.policy.retry_inside_window && retries_left)
    }

    async fn accept(
        &self,
        state: &mut CacheState,
        mut snapshot: RateSnapshot,
        now: DateTime<Utc>,
    ) -> RateSnapshot {
        snapshot.fetch_error = None;
        state.snapshot = Some(snapshot.clone());
        state.retry_count = 0;
        state.status = CacheStatus::Fresh;

        let entry = StoredRates {
            rates: snapshot.rates,
            updated_at: snapshot.fetched_at,
            stored_at: now,
        };
        if let Err(e) = self.store.save(&entry).await {
            warn!("Failed to persist gold rates: {e:#}");
        }
        snapshot
    }

    async fn offline_or_unavailable(
        &self,
        state: &mut CacheState,
        now: DateTime<Utc>,
    ) -> RateSnapshot {
        match self.load_offline(now).await {
            Some((entry, age)) => {
                state.status = CacheStatus::FallbackWithError;
                RateSnapshot::new(entry.rates, entry.updated_at).with_error(format!(
                    "Unable to reach the rate service. Showing offline rates saved {} ago.",
                    format_age(age)
                ))
            }
            None => {
                state.status = CacheStatus::ErrorSentinel;
                RateSnapshot::unavailable(now, UNAVAILABLE_MESSAGE)
            }
        }
    }

    async fn load_offline(&self, now: DateTime<Utc>) -> Option<(StoredRates, Duration)> {
        let entry = match self.store.load().await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to load offline gold rates: {e:#}");
                return None;
            }
        };

        if let Err(e) = entry.rates.validate() {
            warn!("Ignoring invalid offline gold rates: {e:#}");
            return None;
        }

        let age = (now - entry.stored_at).max(Duration::zero());
        if age > self.policy.offline_max_age {
            debug!(stored_at = %entry.stored_at, "Ignoring expired offline gold rates");
            return None;
        }
        Some((entry, age))
    }
}

fn format_age(age: Duration) -> String {
    let (value, unit) = if age.num_days() > 0 {
        (age.num_days(), "day")
    } else if age.num_hours() > 0 {
        (age.num_hours(), "hour")
    } else {
        (age.num_minutes(), "minute")
    };
    format!("{value} {unit}{}", if value == 1 { "" } else { "s" })
}
