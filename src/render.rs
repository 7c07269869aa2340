//! Plain-text rendering of a `RenderState` for the terminal.

use crate::aggregate::ChartData;
use crate::controller::RenderState;
use crate::model::{Amount, Transaction, TransactionType};
use crate::pipeline::CategoryFilter;
use rust_decimal::Decimal;
use std::fmt::Write;

pub const NO_TRANSACTIONS: &str = "No transactions found.";
pub const NO_EXPENSES: &str = "No expenses to chart.";
pub const ALL_CATEGORIES: &str = "all";

/// One line per transaction: id, date, title, category and the signed amount.
pub fn rows<'a, I>(view: I) -> String
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut out = String::new();
    for t in view {
        let sign = match t.r#type() {
            TransactionType::Income => '+',
            TransactionType::Expense => '-',
        };
        let _ = writeln!(
            out,
            "{:>14}  {:<10}  {} ({})  {sign}{}",
            t.id(),
            t.date(),
            t.title(),
            t.category(),
            t.amount()
        );
    }
    if out.is_empty() {
        out.push_str(NO_TRANSACTIONS);
        out.push('\n');
    }
    out
}

/// A legend-style listing of the chart slices, or a note that the chart is hidden.
pub fn chart(chart: Option<&ChartData>) -> String {
    let chart = match chart {
        Some(chart) => chart,
        None => return "Expense chart hidden while showing income only.\n".to_string(),
    };
    if chart.is_empty() {
        return format!("{NO_EXPENSES}\n");
    }
    let total: f64 = chart.values.iter().sum();
    let mut out = String::from("Expenses by category:\n");
    for ((label, value), color) in chart.labels.iter().zip(&chart.values).zip(&chart.colors) {
        let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
        let amount = Decimal::try_from(*value).map(Amount::new).unwrap_or_default();
        let _ = writeln!(out, "  {color}  {label}: {amount} ({share:.1}%)");
    }
    out
}

/// The category filter choices, starting with the "all" wildcard.
pub fn categories(categories: &[String]) -> String {
    let mut out = format!("{ALL_CATEGORIES}\n");
    for c in categories {
        out.push_str(c);
        out.push('\n');
    }
    out
}

/// The full frame: any error or warning first, then the rows and the chart.
pub fn state(state: &RenderState) -> String {
    let mut out = String::new();
    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error: {error}");
    }
    if let Some(warning) = &state.warning {
        let _ = writeln!(out, "Warning: {warning}");
    }
    let sort = match state.sort.active() {
        Some(key) => format!("{key} {}", state.sort.direction(key)),
        None => "none".to_string(),
    };
    let category = match &state.filter.category_filter {
        CategoryFilter::All => ALL_CATEGORIES,
        CategoryFilter::Only(c) => c.as_str(),
    };
    let _ = writeln!(
        out,
        "Type: {}  Category: {category}  Sort: {sort}",
        state.filter.type_filter
    );
    out.push_str(&rows(&state.view));
    out.push_str(&chart(state.chart.as_ref()));
    out
}
