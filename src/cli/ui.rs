use crate::core::RateSnapshot;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn amount_cell(value: f64) -> Cell {
    Cell::new(format_amount(value)).set_alignment(CellAlignment::Right)
}

pub fn count_cell(value: u64, color: Color) -> Cell {
    let cell = Cell::new(value).set_alignment(CellAlignment::Right);
    if value > 0 { cell.fg(color) } else { cell }
}

pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

/// Table of per-gram rates, one row per purity tier.
pub fn rates_table(snapshot: &RateSnapshot) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![header_cell("Purity"), header_cell("Rate / gram")]);
    for (tier, rate) in snapshot.rates.iter() {
        table.add_row(vec![Cell::new(tier), amount_cell(rate)]);
    }
    table
}

/// Prints the advisory line shown above degraded rates.
pub fn print_fetch_error(snapshot: &RateSnapshot) {
    if let Some(message) = &snapshot.fetch_error {
        println!("{}", style_text(&format!("⚠ {message}"), StyleType::Error));
    }
}

pub fn print_updated_at(snapshot: &RateSnapshot) {
    let text = format!(
        "Updated {}",
        snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("{}", style_text(&text, StyleType::Subtle));
}

/// Creates a spinner shown while a network call is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
