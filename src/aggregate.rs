//! Reduces a view to per-category expense totals and turns those into chart data.

use crate::model::Transaction;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// The colors assigned to chart slices, in order.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#f44336", "#e57373", "#ba000d", "#ff8a80", "#d32f2f", "#4caf50", "#81c784", "#2e7d32",
    "#a5d6a7", "#388e3c",
];

/// Summed expense amounts keyed by category, in order of each category's first appearance in
/// the view. Categories without expenses are absent rather than zero.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
pub struct CategoryAggregate {
    totals: Vec<(String, Decimal)>,
}

impl CategoryAggregate {
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.totals
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, total)| *total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.totals.iter().map(|(c, total)| (c.as_str(), *total))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.totals.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// The sum over every category.
    pub fn total(&self) -> Decimal {
        self.totals.iter().map(|(_, total)| *total).sum()
    }
}

/// Sums the amounts of the `expense` transactions in `view` by category.
pub fn aggregate<'a, I>(view: I) -> CategoryAggregate
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for t in view.into_iter().filter(|t| t.is_expense()) {
        let amount = t.amount().value();
        match totals.iter_mut().find(|(c, _)| c == t.category()) {
            Some((_, total)) => *total += amount,
            None => totals.push((t.category().to_string(), amount)),
        }
    }
    CategoryAggregate { totals }
}

/// What a chart widget needs: one label, value and color per slice.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

impl ChartData {
    /// Colors are handed out in key order. The palette is cut to the number of categories and
    /// starts over from the first color when there are more categories than colors.
    pub fn new<S: AsRef<str>>(aggregate: &CategoryAggregate, palette: &[S]) -> Self {
        let labels: Vec<String> = aggregate.categories().map(str::to_string).collect();
        let values = aggregate
            .iter()
            .map(|(_, total)| total.to_f64().unwrap_or_default())
            .collect();
        let colors = palette
            .iter()
            .map(|c| c.as_ref().to_string())
            .cycle()
            .take(labels.len())
            .collect();
        Self {
            labels,
            values,
            colors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
