//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Stock level below which a product is flagged as running low.
const LOW_STOCK_THRESHOLD: u32 = 5;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// CSS class for a stock count cell.
///
/// Usage in templates: `{{ product.stock|stock_class }}`
#[askama::filter_fn]
pub fn stock_class(stock: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(stock
        .to_string()
        .parse::<u32>()
        .map_or("stock", stock_class_for))
}

fn stock_class_for(stock: u32) -> &'static str {
    match stock {
        0 => "stock stock-out",
        n if n < LOW_STOCK_THRESHOLD => "stock stock-low",
        _ => "stock",
    }
}
