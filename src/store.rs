//! The authoritative, insertion-ordered list of transactions and its persistence.

use crate::error::ValidationError;
use crate::model::{Transaction, TransactionForm, TransactionId};
use crate::seed::SeedSource;
use crate::storage::Storage;
use crate::{utils, Result};
use anyhow::Context;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Why a mutation of the store did not fully succeed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The submitted transaction was rejected and nothing changed.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The change was applied in memory but could not be written to storage.
    #[error(transparent)]
    Persist(anyhow::Error),
}

/// Owns every `Transaction`. All mutation goes through `add` and `remove`, each of which writes
/// a full snapshot to `storage` afterward.
#[derive(Debug)]
pub struct TransactionStore<S: Storage> {
    storage: S,
    transactions: Vec<Transaction>,
    /// True when the in-memory list has changes that the last write did not capture.
    dirty: bool,
}

impl<S: Storage> TransactionStore<S> {
    /// Creates an empty store. Call `load` before using it.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            transactions: Vec::new(),
            dirty: false,
        }
    }

    /// Reads the persisted snapshot. When there is none, the store is initialized from `seed`
    /// and that initial snapshot is persisted right away. A seed that cannot be fetched leaves
    /// the store empty; that is logged and is not an error.
    ///
    /// # Errors
    /// - The storage cannot be read.
    /// - A persisted snapshot exists but is not a valid list of transactions.
    pub async fn load(&mut self, seed: &dyn SeedSource) -> Result<()> {
        let persisted = self
            .storage
            .read()
            .await
            .context("Unable to read persisted transactions")?;

        match persisted {
            Some(blob) => {
                let persisted = serde_json::from_str(&blob)
                    .context("The persisted transactions could not be parsed")?;
                self.transactions = unique_ids(persisted);
                self.dirty = false;
                debug!("Loaded {} persisted transactions", self.transactions.len());
            }
            None => match seed.fetch().await {
                Ok(seeded) => {
                    self.transactions = unique_ids(seeded);
                    info!("Initialized {} transactions from seed data", self.len());
                    if let Err(e) = self.persist().await {
                        error!("Unable to persist the seed data: {e:#}");
                    }
                }
                Err(e) => {
                    warn!("Unable to load seed data, starting with no transactions: {e:#}");
                    self.transactions = Vec::new();
                    self.dirty = false;
                }
            },
        }
        Ok(())
    }

    /// Validates `form` and, when it is acceptable, appends a new transaction with a fresh `id`
    /// and persists. Returns the new `id`.
    ///
    /// # Errors
    /// - `StoreError::Invalid` if a field is missing or malformed. The store is unchanged.
    /// - `StoreError::Persist` if the write failed. The transaction is kept in memory.
    pub async fn add(
        &mut self,
        form: &TransactionForm,
    ) -> std::result::Result<TransactionId, StoreError> {
        let entry = form.validate()?;
        let id = self.next_id();
        self.transactions.push(Transaction::new(id, entry));
        debug!("Added transaction {id}");
        self.persist().await.map_err(StoreError::Persist)?;
        Ok(id)
    }

    /// Removes the transaction with `id` if there is one, then persists. Returns whether a
    /// transaction was removed; an unknown `id` is not an error.
    ///
    /// # Errors
    /// - `StoreError::Persist` if the write failed. The removal is kept in memory.
    pub async fn remove(&mut self, id: TransactionId) -> std::result::Result<bool, StoreError> {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id() != id);
        let removed = self.transactions.len() != before;
        if removed {
            debug!("Removed transaction {id}");
        } else {
            debug!("No transaction with id {id} to remove");
        }
        self.persist().await.map_err(StoreError::Persist)?;
        Ok(removed)
    }

    /// The full list in insertion order.
    pub fn snapshot(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Whether memory holds changes that could not be written.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Serializes the full list and writes it to storage.
    pub async fn persist(&mut self) -> Result<()> {
        let blob =
            serde_json::to_string(&self.transactions).context("Unable to serialize transactions")?;
        match self.storage.write(&blob).await {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                error!("Unable to persist transactions: {e:#}");
                Err(e.context("Unable to persist transactions"))
            }
        }
    }

    /// The creation time in milliseconds, bumped past the largest existing `id` when two
    /// transactions are created within the same millisecond. If the largest `id` is already
    /// `i64::MAX`, the first unused value at or after the clock is taken instead.
    fn next_id(&self) -> TransactionId {
        let now = utils::now_millis();
        let id = match self.transactions.iter().map(|t| t.id().value()).max() {
            Some(max) if max >= now => max
                .checked_add(1)
                .unwrap_or_else(|| self.first_unused_id(now)),
            _ => now,
        };
        TransactionId::new(id)
    }

    fn first_unused_id(&self, start: i64) -> i64 {
        let used: HashSet<i64> = self.transactions.iter().map(|t| t.id().value()).collect();
        (start..=i64::MAX)
            .chain(i64::MIN..start)
            .find(|id| !used.contains(id))
            .unwrap_or(start)
    }
}

/// Drops later entries that repeat an earlier `id`.
fn unique_ids(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    transactions
        .into_iter()
        .filter(|t| {
            let first = seen.insert(t.id());
            if !first {
                warn!("Ignoring transaction with duplicate id {}", t.id());
            }
            first
        })
        .collect()
}
