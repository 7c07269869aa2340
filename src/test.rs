//! Shared test utilities for creating transactions and test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Transaction, TransactionForm, TransactionId, TransactionType};
use crate::seed::SeedSource;
use crate::{utils, Config, Result};
use anyhow::bail;
use std::borrow::Borrow;
use tempfile::TempDir;

/// The form from the "add a coffee" scenario.
pub fn coffee() -> TransactionForm {
    TransactionForm::new("Coffee", "5", "expense", "2024-01-01", "food")
}

/// Builds a transaction with a fixed `id`, bypassing the store.
pub fn transaction(
    id: i64,
    r#type: TransactionType,
    category: &str,
    amount: &str,
    date: &str,
) -> Transaction {
    let form = TransactionForm::new(
        format!("{category} {id}"),
        amount,
        r#type.to_string(),
        date,
        category,
    );
    Transaction::new(TransactionId::new(id), form.validate().unwrap())
}

/// A small data set covering both types, several categories and distinct dates and amounts.
pub fn sample_transactions() -> Vec<Transaction> {
    use TransactionType::{Expense, Income};
    vec![
        transaction(1, Income, "salary", "2500", "2024-01-01"),
        transaction(2, Expense, "food", "12.40", "2024-01-03"),
        transaction(3, Expense, "travel", "320", "2024-01-02"),
        transaction(4, Expense, "food", "48.10", "2024-01-05"),
        transaction(5, Income, "gifts", "100", "2024-01-04"),
        transaction(6, Expense, "rent", "900", "2024-01-06"),
    ]
}

/// The ids of `view`, in order.
pub fn ids<T: Borrow<Transaction>>(view: &[T]) -> Vec<i64> {
    view.iter().map(|t| t.borrow().id().value()).collect()
}

/// A seed source that is never reachable.
pub struct FailingSeed;

#[async_trait::async_trait]
impl SeedSource for FailingSeed {
    async fn fetch(&self) -> Result<Vec<Transaction>> {
        bail!("Seed server is unreachable")
    }
}

#[async_trait::async_trait]
impl SeedSource for Vec<Transaction> {
    async fn fetch(&self) -> Result<Vec<Transaction>> {
        Ok(self.clone())
    }
}

/// Test environment that sets up a spendlog home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment whose seed file holds `sample_transactions`.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("spendlog");
        utils::make_dir(&root).await.unwrap();
        let seed = serde_json::to_string_pretty(&sample_transactions()).unwrap();
        utils::write(root.join("seed.json"), seed).await.unwrap();
        let config = Config::create(&root, Some("seed.json")).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Creates a test environment without any seed data.
    pub async fn empty() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::create(temp_dir.path().join("spendlog"), None)
            .await
            .unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// The transactions currently persisted in the storage slot.
    pub async fn persisted(&self) -> Vec<Transaction> {
        utils::deserialize(self.config.storage().path())
            .await
            .unwrap()
    }
}
