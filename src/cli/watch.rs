use super::ui::{self, StyleType};
use crate::rate_cache::RateCache;
use anyhow::Result;
use std::time::Duration;
use tracing::debug;

/// Re-reads rates on a fixed tick, reusing one cache for the whole session.
/// Runs until interrupted unless `count` limits the number of ticks.
pub async fn watch_rates(cache: &RateCache, every: Duration, count: Option<u64>) -> Result<()> {
    let mut ticker = tokio::time::interval(every);
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                debug!("Watch interrupted");
                return Ok(());
            }
        }

        let snapshot = cache.get(false).await;
        let now = chrono::Utc::now().format("%H:%M:%S").to_string();
        println!("\n{}", ui::style_text(&now, StyleType::Subtle));
        ui::print_fetch_error(&snapshot);
        println!("{}", ui::rates_table(&snapshot));

        ticks += 1;
        if count.is_some_and(|limit| ticks >= limit) {
            return Ok(());
        }
    }
}
