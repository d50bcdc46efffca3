use super::ui::{self, StyleType};
use crate::core::PropagationResult;
use crate::rate_cache::RateCache;
use anyhow::Result;
use comfy_table::{Cell, Color, Table};

pub fn propagation_table(result: &PropagationResult) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Products"), ui::header_cell("Count")]);
    table.add_row(vec![
        Cell::new("Updated"),
        ui::count_cell(result.updated_count, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Skipped"),
        ui::count_cell(result.skipped_count, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Failed"),
        ui::count_cell(result.error_count, Color::Red),
    ]);
    table
}

fn describe_error(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Refreshes rates on the backend and reports the product price update.
pub async fn refresh_rates(cache: &RateCache) -> Result<()> {
    let spinner = ui::new_spinner("Refreshing gold rates and product prices...");
    let result = cache.force_refresh_and_propagate().await;
    spinner.finish_and_clear();
    let outcome = result?;

    println!("\n{}", ui::style_text("Gold Rates", StyleType::Title));
    println!("{}", ui::rates_table(&outcome.snapshot));
    ui::print_updated_at(&outcome.snapshot);

    let propagation = &outcome.propagation;
    println!("\n{}", ui::style_text("Price Update", StyleType::Title));
    if !propagation.success {
        println!(
            "{}",
            ui::style_text("Product price update reported failure", StyleType::Error)
        );
    }
    println!("{}", propagation_table(propagation));

    if let Some(errors) = propagation.errors.as_ref().filter(|e| !e.is_empty()) {
        for error in errors {
            println!(
                "  {}",
                ui::style_text(&describe_error(error), StyleType::Subtle)
            );
        }
    }
    Ok(())
}
