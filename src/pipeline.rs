//! Filtering and sorting of the transaction list into the view shown to the user.

use crate::model::{Transaction, TransactionType};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;

/// Which transaction types pass the filter.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TypeFilter);
serde_plain::derive_fromstr_from_deserialize!(TypeFilter);

impl TypeFilter {
    pub fn matches(&self, r#type: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => r#type == TransactionType::Income,
            TypeFilter::Expense => r#type == TransactionType::Expense,
        }
    }
}

/// Which category passes the filter.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl Serialize for CategoryFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CategoryFilter::All => serializer.serialize_str("all"),
            CategoryFilter::Only(category) => serializer.serialize_str(category),
        }
    }
}

impl CategoryFilter {
    /// `all` (or nothing) selects every category; anything else selects that category exactly.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" | "all" => CategoryFilter::All,
            category => CategoryFilter::Only(category.to_string()),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

/// The type and category filters. Both must pass for a transaction to be kept.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
pub struct FilterConfig {
    pub type_filter: TypeFilter,
    pub category_filter: CategoryFilter,
}

impl FilterConfig {
    pub fn new(type_filter: TypeFilter, category_filter: CategoryFilter) -> Self {
        Self {
            type_filter,
            category_filter,
        }
    }

    pub fn matches(&self, t: &Transaction) -> bool {
        self.type_filter.matches(t.r#type()) && self.category_filter.matches(t.category())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Amount,
}

serde_plain::derive_display_from_serialize!(SortKey);
serde_plain::derive_fromstr_from_deserialize!(SortKey);

#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

serde_plain::derive_display_from_serialize!(SortDirection);
serde_plain::derive_fromstr_from_deserialize!(SortDirection);

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// The active sort key plus a remembered direction for each key.
///
/// Nothing is sorted until a key is activated. The first activation of a key sorts descending
/// and every later activation of the same key flips its direction. Activating the other key
/// replaces the active key; the inactive key keeps its direction for when it is activated
/// again.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct SortConfig {
    active: Option<SortKey>,
    /// `None` until the key is first activated.
    date: Option<SortDirection>,
    amount: Option<SortDirection>,
}

impl SortConfig {
    /// No sort key; the view keeps store order.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sorts by `key` in `direction` straight away.
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        let mut config = Self::default();
        *config.slot(key) = Some(direction);
        config.active = Some(key);
        config
    }

    /// Activates `key`, flipping its direction if it has been activated before.
    pub fn toggle(&mut self, key: SortKey) {
        let slot = self.slot(key);
        *slot = Some(match *slot {
            None => SortDirection::default(),
            Some(direction) => direction.flip(),
        });
        self.active = Some(key);
    }

    pub fn active(&self) -> Option<SortKey> {
        self.active
    }

    /// The direction `key` sorts in when it is (or becomes) active.
    pub fn direction(&self, key: SortKey) -> SortDirection {
        match key {
            SortKey::Date => self.date,
            SortKey::Amount => self.amount,
        }
        .unwrap_or_default()
    }

    fn slot(&mut self, key: SortKey) -> &mut Option<SortDirection> {
        match key {
            SortKey::Date => &mut self.date,
            SortKey::Amount => &mut self.amount,
        }
    }
}

/// Produces the view: the transactions that pass `filter`, ordered by `sort`. The relative
/// order of equal keys is not part of the contract.
pub fn apply<'a>(
    transactions: &'a [Transaction],
    filter: &FilterConfig,
    sort: &SortConfig,
) -> Vec<&'a Transaction> {
    let mut view: Vec<&Transaction> = transactions.iter().filter(|t| filter.matches(t)).collect();
    if let Some(key) = sort.active() {
        let direction = sort.direction(key);
        match key {
            SortKey::Date => view.sort_by(|a, b| compare_dates(a, b, direction)),
            SortKey::Amount => {
                view.sort_by(|a, b| direction.apply(a.amount().value().cmp(&b.amount().value())))
            }
        }
    }
    view
}

/// Dates that cannot be parsed go after all parseable dates in either direction, so the order
/// stays total.
fn compare_dates(a: &Transaction, b: &Transaction, direction: SortDirection) -> Ordering {
    match (a.parsed_instant(), b.parsed_instant()) {
        (Some(x), Some(y)) => direction.apply(x.cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionType::{Expense, Income};
    use crate::test::{ids, sample_transactions, transaction};

    fn dated() -> Vec<Transaction> {
        vec![
            transaction(1, Expense, "food", "5", "2024-01-02"),
            transaction(2, Income, "salary", "1000", "2024-01-01"),
            transaction(3, Expense, "travel", "250", "2024-01-03"),
        ]
    }

    #[test]
    fn test_no_filter_no_sort_is_identity() {
        let transactions = sample_transactions();
        let view = apply(&transactions, &FilterConfig::default(), &SortConfig::none());
        let expected: Vec<&Transaction> = transactions.iter().collect();
        assert_eq!(view, expected);
    }

    #[test]
    fn test_type_filter() {
        let transactions = dated();
        let filter = FilterConfig::new(TypeFilter::Income, CategoryFilter::All);
        let view = apply(&transactions, &filter, &SortConfig::none());
        assert_eq!(ids(&view), [2]);

        let filter = FilterConfig::new(TypeFilter::Expense, CategoryFilter::All);
        let view = apply(&transactions, &filter, &SortConfig::none());
        assert_eq!(ids(&view), [1, 3]);
    }

    #[test]
    fn test_category_filter() {
        let transactions = dated();
        let filter = FilterConfig::new(TypeFilter::All, CategoryFilter::parse("travel"));
        let view = apply(&transactions, &filter, &SortConfig::none());
        assert_eq!(ids(&view), [3]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let transactions = dated();
        let filter = FilterConfig::new(TypeFilter::Income, CategoryFilter::parse("food"));
        assert!(apply(&transactions, &filter, &SortConfig::none()).is_empty());
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(" "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" food "),
            CategoryFilter::Only("food".into())
        );
    }

    #[test]
    fn test_sort_by_date_toggles() {
        let transactions = dated();
        let mut sort = SortConfig::none();

        sort.toggle(SortKey::Date);
        assert_eq!(sort.direction(SortKey::Date), SortDirection::Desc);
        let first = ids(&apply(&transactions, &FilterConfig::default(), &sort));
        assert_eq!(first, [3, 1, 2]);

        sort.toggle(SortKey::Date);
        assert_eq!(sort.direction(SortKey::Date), SortDirection::Asc);
        let second = ids(&apply(&transactions, &FilterConfig::default(), &sort));
        let mut reversed = first.clone();
        reversed.reverse();
        assert_eq!(second, reversed);
    }

    #[test]
    fn test_sort_by_amount() {
        let transactions = dated();
        let view = apply(
            &transactions,
            &FilterConfig::default(),
            &SortConfig::by(SortKey::Amount, SortDirection::Asc),
        );
        assert_eq!(ids(&view), [1, 3, 2]);
        let view = apply(
            &transactions,
            &FilterConfig::default(),
            &SortConfig::by(SortKey::Amount, SortDirection::Desc),
        );
        assert_eq!(ids(&view), [2, 3, 1]);
    }

    #[test]
    fn test_switching_keys_remembers_direction() {
        let mut sort = SortConfig::none();
        sort.toggle(SortKey::Date);
        sort.toggle(SortKey::Date);
        sort.toggle(SortKey::Amount);
        assert_eq!(sort.active(), Some(SortKey::Amount));
        assert_eq!(sort.direction(SortKey::Amount), SortDirection::Desc);
        assert_eq!(sort.direction(SortKey::Date), SortDirection::Asc);

        sort.toggle(SortKey::Date);
        assert_eq!(sort.active(), Some(SortKey::Date));
        assert_eq!(sort.direction(SortKey::Date), SortDirection::Desc);
        assert_eq!(sort.direction(SortKey::Amount), SortDirection::Desc);
    }

    #[test]
    fn test_sort_applies_after_filter() {
        let transactions = dated();
        let filter = FilterConfig::new(TypeFilter::Expense, CategoryFilter::All);
        let sort = SortConfig::by(SortKey::Date, SortDirection::Asc);
        assert_eq!(ids(&apply(&transactions, &filter, &sort)), [1, 3]);
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let transactions = vec![
            transaction(1, Expense, "food", "5", "not a date"),
            transaction(2, Expense, "food", "5", "2024-01-01"),
            transaction(3, Expense, "food", "5", "2024-06-01"),
        ];
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let sort = SortConfig::by(SortKey::Date, direction);
            let view = apply(&transactions, &FilterConfig::default(), &sort);
            assert_eq!(view.len(), 3);
            assert_eq!(view[2].id().value(), 1, "{direction}");
        }
    }

    #[test]
    fn test_sort_by_date_uses_time_of_day() {
        let transactions = vec![
            transaction(1, Expense, "food", "5", "2024-03-05T09:00:00Z"),
            transaction(2, Expense, "food", "5", "2024-03-05T18:30:00Z"),
            transaction(3, Expense, "food", "5", "2024-03-05T12:00:00+02:00"),
        ];
        let sort = SortConfig::by(SortKey::Date, SortDirection::Asc);
        let view = apply(&transactions, &FilterConfig::default(), &sort);
        assert_eq!(ids(&view), vec![1, 3, 2]);

        let sort = SortConfig::by(SortKey::Date, SortDirection::Desc);
        let view = apply(&transactions, &FilterConfig::default(), &sort);
        assert_eq!(ids(&view), vec![2, 3, 1]);
    }
}
