use super::ui::{self, StyleType};
use crate::rate_cache::RateCache;
use anyhow::Result;

/// Shows current rates. Degraded results are printed with an advisory line
/// rather than failing the command.
pub async fn display_rates(cache: &RateCache, force_refresh: bool) -> Result<()> {
    let spinner = ui::new_spinner("Fetching gold rates...");
    let snapshot = cache.get(force_refresh).await;
    spinner.finish_and_clear();

    println!("\n{}", ui::style_text("Gold Rates", StyleType::Title));
    ui::print_fetch_error(&snapshot);
    println!("{}", ui::rates_table(&snapshot));
    ui::print_updated_at(&snapshot);
    Ok(())
}
