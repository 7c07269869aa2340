//! The distinct categories present in the store, used to populate the category filter.

use crate::model::Transaction;
use std::collections::BTreeSet;

/// The sorted, de-duplicated category names. It is rebuilt from scratch whenever the store
/// changes rather than being maintained incrementally.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct CategoryIndex {
    categories: Vec<String>,
}

impl CategoryIndex {
    pub fn new(transactions: &[Transaction]) -> Self {
        let mut index = Self::default();
        index.refresh(transactions);
        index
    }

    /// Recomputes the index from `transactions`.
    pub fn refresh(&mut self, transactions: &[Transaction]) {
        self.categories = transactions
            .iter()
            .map(|t| t.category())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
    }

    /// Distinct category names in lexicographic order. The "all categories" choice is not part
    /// of this list.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(category))
            .is_ok()
    }
}
