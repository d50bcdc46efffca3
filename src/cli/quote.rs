use super::ui::{self, StyleType};
use crate::core::{PurityTier, TierRates};
use crate::rate_cache::RateCache;
use anyhow::{Result, bail};

/// Metal value of `grams` of gold at the given purity.
pub fn metal_value(rates: &TierRates, tier: PurityTier, grams: f64) -> Result<f64> {
    if !grams.is_finite() || grams < 0.0 {
        bail!("Invalid weight: {} grams", grams);
    }
    Ok(rates.get(tier) * grams)
}

pub async fn display_quote(cache: &RateCache, tier: PurityTier, grams: f64) -> Result<()> {
    let spinner = ui::new_spinner("Fetching gold rates...");
    let snapshot = cache.get(false).await;
    spinner.finish_and_clear();

    let value = metal_value(&snapshot.rates, tier, grams)?;

    ui::print_fetch_error(&snapshot);
    println!(
        "{} {}",
        ui::style_text(&format!("{grams} g of {tier} gold:"), StyleType::TotalLabel),
        ui::style_text(&ui::format_amount(value), StyleType::TotalValue)
    );
    println!(
        "{}",
        ui::style_text(
            &format!("at {} / gram", ui::format_amount(snapshot.rates.get(tier))),
            StyleType::Subtle
        )
    );
    ui::print_updated_at(&snapshot);
    Ok(())
}
