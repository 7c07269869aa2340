use crate::error::ValidationError;
use crate::model::Amount;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The unique identifier of a transaction within the store. It is derived from the creation
/// time in milliseconds.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for TransactionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Whether money came in or went out.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// A single recorded income or expense event.
///
/// Transactions are never edited. They are created from a validated `TransactionForm` and
/// removed by `id`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    id: TransactionId,
    title: String,
    amount: Amount,
    #[serde(rename = "type")]
    r#type: TransactionType,
    /// An ISO-8601 calendar date, kept exactly as it was entered.
    date: String,
    category: String,
}

impl Transaction {
    pub fn new(id: TransactionId, entry: NewTransaction) -> Self {
        Self {
            id,
            title: entry.title,
            amount: entry.amount,
            r#type: entry.r#type,
            date: entry.date,
            category: entry.category,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn r#type(&self) -> TransactionType {
        self.r#type
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }

    /// Parses `date` to an instant for ordering. RFC 3339 timestamps keep their time of day and
    /// offset; a plain `YYYY-MM-DD` date is taken as midnight UTC. Anything else yields `None`.
    pub fn parsed_instant(&self) -> Option<DateTime<Utc>> {
        let s = self.date.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc())
            .or_else(|| {
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|d| d.with_timezone(&Utc))
            })
    }
}

/// The raw values of the entry form, exactly as the user supplied them.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub title: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub date: String,
    pub category: String,
}

impl TransactionForm {
    pub fn new(
        title: impl Into<String>,
        amount: impl Into<String>,
        r#type: impl Into<String>,
        date: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            amount: amount.into(),
            r#type: r#type.into(),
            date: date.into(),
            category: category.into(),
        }
    }

    /// Checks every field. Title and category are trimmed, the amount must parse to a number
    /// greater than zero, the date must be present.
    pub fn validate(&self) -> Result<NewTransaction, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let amount = Amount::from_str(&self.amount)
            .ok()
            .filter(Amount::is_positive)
            .ok_or_else(|| ValidationError::InvalidAmount(self.amount.clone()))?;
        let r#type = TransactionType::from_str(self.r#type.trim())
            .map_err(|_| ValidationError::InvalidType(self.r#type.clone()))?;
        let date = self.date.trim();
        if date.is_empty() {
            return Err(ValidationError::EmptyDate);
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        Ok(NewTransaction {
            title: title.to_string(),
            amount,
            r#type,
            date: date.to_string(),
            category: category.to_string(),
        })
    }
}

/// A validated entry that has not been assigned an `id` yet.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewTransaction {
    title: String,
    amount: Amount,
    r#type: TransactionType,
    date: String,
    category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coffee() -> TransactionForm {
        TransactionForm::new("Coffee", "5", "expense", "2024-01-01", "food")
    }

    #[test]
    fn test_validate_ok() {
        let entry = coffee().validate().unwrap();
        let t = Transaction::new(TransactionId::new(7), entry);
        assert_eq!(t.id().value(), 7);
        assert_eq!(t.title(), "Coffee");
        assert_eq!(t.amount().to_string(), "5.00");
        assert_eq!(t.r#type(), TransactionType::Expense);
        assert_eq!(t.date(), "2024-01-01");
        assert_eq!(t.category(), "food");
    }

    #[test]
    fn test_validate_trims_title_and_category() {
        let mut form = coffee();
        form.title = "  Coffee  ".into();
        form.category = "\tfood ".into();
        let t = Transaction::new(TransactionId::new(1), form.validate().unwrap());
        assert_eq!(t.title(), "Coffee");
        assert_eq!(t.category(), "food");
    }

    #[test]
    fn test_validate_blank_title() {
        let mut form = coffee();
        form.title = "   ".into();
        assert_eq!(form.validate().unwrap_err(), ValidationError::EmptyTitle);
    }

    #[test]
    fn test_validate_bad_amounts() {
        for bad in ["", "0", "-5", "abc", "0.00"] {
            let mut form = coffee();
            form.amount = bad.into();
            assert_eq!(
                form.validate().unwrap_err(),
                ValidationError::InvalidAmount(bad.into()),
                "amount {bad:?}"
            );
        }
    }

    #[test]
    fn test_validate_bad_type() {
        let mut form = coffee();
        form.r#type = "gift".into();
        assert!(matches!(
            form.validate().unwrap_err(),
            ValidationError::InvalidType(_)
        ));
    }

    #[test]
    fn test_validate_empty_date() {
        let mut form = coffee();
        form.date = String::new();
        assert_eq!(form.validate().unwrap_err(), ValidationError::EmptyDate);
    }

    #[test]
    fn test_validate_blank_category() {
        let mut form = coffee();
        form.category = " ".into();
        assert_eq!(form.validate().unwrap_err(), ValidationError::EmptyCategory);
    }

    #[test]
    fn test_json_shape() {
        let t = Transaction::new(TransactionId::new(1704067200000), coffee().validate().unwrap());
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["id"], 1704067200000_i64);
        assert_eq!(value["title"], "Coffee");
        assert_eq!(value["amount"], 5.0);
        assert_eq!(value["type"], "expense");
        assert_eq!(value["date"], "2024-01-01");
        assert_eq!(value["category"], "food");
    }

    #[test]
    fn test_parse_seed_shape() {
        let json = r#"{"id": 1, "title": "Salary", "amount": 1500,
            "type": "income", "date": "2024-02-01", "category": "salary"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.r#type(), TransactionType::Income);
        assert!(!t.is_expense());
        assert_eq!(t.amount().to_string(), "1,500.00");
    }

    #[test]
    fn test_parsed_instant() {
        let mut t = Transaction::new(TransactionId::new(1), coffee().validate().unwrap());
        let midnight = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(t.parsed_instant(), Some(midnight.with_timezone(&Utc)));

        t.date = "2024-03-05T10:00:00+02:00".into();
        let morning = DateTime::parse_from_rfc3339("2024-03-05T08:00:00Z").unwrap();
        assert_eq!(t.parsed_instant(), Some(morning.with_timezone(&Utc)));

        t.date = "yesterday".into();
        assert_eq!(t.parsed_instant(), None);
    }

    #[test]
    fn test_transaction_type_strings() {
        assert_eq!(TransactionType::Income.to_string(), "income");
        assert_eq!(
            TransactionType::from_str("expense").unwrap(),
            TransactionType::Expense
        );
        assert!(TransactionType::from_str("all").is_err());
    }
}
