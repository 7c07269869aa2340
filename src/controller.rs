//! The `Controller` owns the store together with the filter and sort state, and exposes the
//! commands a user interface can issue. Every command re-runs the pipeline and aggregation and
//! returns a fresh `RenderState`.

use crate::aggregate::{aggregate, CategoryAggregate, ChartData};
use crate::categories::CategoryIndex;
use crate::model::{Transaction, TransactionForm, TransactionId};
use crate::pipeline::{self, CategoryFilter, FilterConfig, SortConfig, SortKey, TypeFilter};
use crate::seed::SeedSource;
use crate::storage::Storage;
use crate::store::{StoreError, TransactionStore};
use crate::Result;
use serde::Serialize;
use tracing::{debug, info};

/// Shown while in-memory changes have not reached storage.
pub const UNSAVED_WARNING: &str =
    "Changes could not be saved and will be lost when the program exits";

/// Everything a user interface needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    /// The filtered and sorted transactions.
    pub view: Vec<Transaction>,
    /// Expense totals by category over `view`.
    pub aggregate: CategoryAggregate,
    /// `None` when the chart should be hidden, which is whenever only income is shown.
    pub chart: Option<ChartData>,
    /// The choices for the category filter, not including "all".
    pub categories: Vec<String>,
    pub filter: FilterConfig,
    pub sort: SortConfig,
    /// A rejected submission, to be shown to the user before anything else.
    pub error: Option<String>,
    /// A non-blocking problem, such as changes that could not be saved.
    pub warning: Option<String>,
}

pub struct Controller<S: Storage> {
    store: TransactionStore<S>,
    index: CategoryIndex,
    filter: FilterConfig,
    sort: SortConfig,
    palette: Vec<String>,
}

impl<S: Storage> Controller<S> {
    /// Loads the store from `storage`, falling back to `seed`, and builds the category index.
    /// Nothing can be rendered until this has completed.
    pub async fn start(storage: S, seed: &dyn SeedSource, palette: Vec<String>) -> Result<Self> {
        let mut store = TransactionStore::new(storage);
        store.load(seed).await?;
        let index = CategoryIndex::new(store.snapshot());
        info!("Loaded {} transactions", store.len());
        Ok(Self {
            store,
            index,
            filter: FilterConfig::default(),
            sort: SortConfig::none(),
            palette,
        })
    }

    /// Validates and records a new transaction. A rejected form leaves everything unchanged
    /// and is reported in `RenderState::error`.
    pub async fn submit_transaction(&mut self, form: &TransactionForm) -> RenderState {
        match self.store.add(form).await {
            Ok(id) => {
                info!("Recorded transaction {id}");
                self.after_mutation();
                self.render()
            }
            Err(StoreError::Invalid(e)) => {
                debug!("Rejected transaction: {e}");
                self.render_with_error(e.to_string())
            }
            Err(StoreError::Persist(_)) => {
                self.after_mutation();
                self.render()
            }
        }
    }

    /// Deletes the transaction with `id`. Unknown ids are ignored.
    pub async fn request_delete(&mut self, id: TransactionId) -> RenderState {
        match self.store.remove(id).await {
            Ok(true) => info!("Deleted transaction {id}"),
            Ok(false) => debug!("Transaction {id} was already gone"),
            // Already logged by the store; the warning comes from the dirty flag.
            Err(_) => {}
        }
        self.after_mutation();
        self.render()
    }

    pub fn set_filter(&mut self, filter: FilterConfig) -> RenderState {
        debug!("Filter set to {filter:?}");
        self.filter = filter;
        self.render()
    }

    pub fn set_type_filter(&mut self, type_filter: TypeFilter) -> RenderState {
        let filter = FilterConfig::new(type_filter, self.filter.category_filter.clone());
        self.set_filter(filter)
    }

    pub fn set_category_filter(&mut self, category_filter: CategoryFilter) -> RenderState {
        let filter = FilterConfig::new(self.filter.type_filter, category_filter);
        self.set_filter(filter)
    }

    /// Makes `key` the active sort key, flipping its direction if it was used before.
    pub fn toggle_sort(&mut self, key: SortKey) -> RenderState {
        self.sort.toggle(key);
        debug!("Sorting by {key} {}", self.sort.direction(key));
        self.render()
    }

    /// Runs the pipeline and aggregation over the current state.
    pub fn render(&self) -> RenderState {
        let view = pipeline::apply(self.store.snapshot(), &self.filter, &self.sort);
        let aggregate = aggregate(view.iter().copied());
        let chart = if self.filter.type_filter == TypeFilter::Income {
            None
        } else {
            Some(ChartData::new(&aggregate, self.palette.as_slice()))
        };
        RenderState {
            view: view.into_iter().cloned().collect(),
            aggregate,
            chart,
            categories: self.index.categories().to_vec(),
            filter: self.filter.clone(),
            sort: self.sort,
            error: None,
            warning: self.store.is_dirty().then(|| UNSAVED_WARNING.to_string()),
        }
    }

    pub fn store(&self) -> &TransactionStore<S> {
        &self.store
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn sort(&self) -> &SortConfig {
        &self.sort
    }

    pub fn categories(&self) -> &[String] {
        self.index.categories()
    }

    fn render_with_error(&self, error: String) -> RenderState {
        RenderState {
            error: Some(error),
            ..self.render()
        }
    }

    /// Rebuilds the category index. A category filter that no longer matches any category
    /// falls back to all categories.
    fn after_mutation(&mut self) {
        self.index.refresh(self.store.snapshot());
        if let CategoryFilter::Only(category) = &self.filter.category_filter {
            if !self.index.contains(category) {
                debug!("Category '{category}' is gone, showing all categories");
                self.filter.category_filter = CategoryFilter::All;
            }
        }
    }
}
