//! Handlers that record, delete and list transactions.

use crate::args::{AddArgs, DeleteArgs, FilterArgs, ListArgs};
use crate::commands::{open, Out};
use crate::controller::RenderState;
use crate::model::{Transaction, TransactionId};
use crate::pipeline::{CategoryFilter, FilterConfig, SortConfig};
use crate::{render, Config, Result};
use anyhow::bail;

/// Records a new transaction and returns it.
///
/// # Errors
/// - Returns an error if a field is missing or malformed; nothing is recorded.
/// - Returns an error if the transaction could not be saved.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Transaction>> {
    let mut controller = open(&config).await?;
    let before = controller.store().len();
    let state = controller.submit_transaction(&args.form()).await;
    fail_on_problems(&state)?;

    let added = match controller.store().snapshot().get(before) {
        Some(t) => t.clone(),
        None => bail!("The transaction was not recorded"),
    };
    let message = format!("Added transaction with ID: {}", added.id());
    Ok(Out::new(message, added))
}

/// Deletes a transaction by ID. An ID that does not exist is reported but is not an error.
///
/// # Errors
/// - Returns an error if the deletion could not be saved.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<bool>> {
    let mut controller = open(&config).await?;
    let id = TransactionId::new(args.id());
    let before = controller.store().len();
    let state = controller.request_delete(id).await;
    fail_on_problems(&state)?;

    let deleted = controller.store().len() < before;
    let message = if deleted {
        format!("Deleted transaction {id}")
    } else {
        format!("No transaction with ID {id}")
    };
    Ok(Out::new(message, deleted))
}

/// Lists the transactions that pass the filters, in the requested order.
pub async fn list(config: Config, args: ListArgs) -> Result<Out<Vec<Transaction>>> {
    let mut controller = open(&config).await?;
    controller.set_filter(filter_config(args.filter()));
    let sort = match args.sort() {
        Some(key) => SortConfig::by(key, args.direction()),
        None => SortConfig::none(),
    };
    let view = crate::pipeline::apply(controller.store().snapshot(), controller.filter(), &sort);
    let message = render::rows(view.iter().copied());
    let structure = view.into_iter().cloned().collect();
    Ok(Out::new(message, structure))
}

pub(super) fn filter_config(args: &FilterArgs) -> FilterConfig {
    FilterConfig::new(args.r#type(), CategoryFilter::parse(args.category()))
}

/// One-shot commands cannot show a warning and carry on, so both problems become errors.
fn fail_on_problems(state: &RenderState) -> Result<()> {
    if let Some(error) = &state.error {
        bail!("{error}");
    }
    if let Some(warning) = &state.warning {
        bail!("{warning}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionType;
    use crate::pipeline::{SortDirection, SortKey, TypeFilter};
    use crate::test::{ids, sample_transactions, TestEnv};

    fn coffee_args() -> AddArgs {
        AddArgs::new("Coffee", "5", TransactionType::Expense, "2024-01-01", "food")
    }

    #[tokio::test]
    async fn test_first_run_persists_seed() {
        let env = TestEnv::new().await;
        let out = list(env.config(), ListArgs::default()).await.unwrap();
        assert_eq!(out.structure().unwrap(), &sample_transactions());
        assert_eq!(env.persisted().await, sample_transactions());
    }

    #[tokio::test]
    async fn test_add_then_delete() {
        let env = TestEnv::empty().await;
        let out = add(env.config(), coffee_args()).await.unwrap();
        let added = out.structure().unwrap().clone();
        assert_eq!(added.title(), "Coffee");
        assert_eq!(env.persisted().await, vec![added.clone()]);

        let out = delete(env.config(), DeleteArgs::new(added.id().value()))
            .await
            .unwrap();
        assert_eq!(out.structure(), Some(&true));
        assert!(env.persisted().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_invalid_is_error() {
        let env = TestEnv::new().await;
        let args = AddArgs::new("Coffee", "-5", TransactionType::Expense, "2024-01-01", "food");
        let err = add(env.config(), args).await.unwrap_err();
        assert!(err.to_string().starts_with("Fill all fields correctly"));
        assert_eq!(env.persisted().await, sample_transactions());
    }

    #[tokio::test]
    async fn test_delete_unknown() {
        let env = TestEnv::new().await;
        let out = delete(env.config(), DeleteArgs::new(424242)).await.unwrap();
        assert_eq!(out.structure(), Some(&false));
        assert!(out.message().starts_with("No transaction"));
        assert_eq!(env.persisted().await, sample_transactions());
    }

    #[tokio::test]
    async fn test_list_filtered_and_sorted() {
        let env = TestEnv::new().await;
        let args = ListArgs::new(
            FilterArgs::new(TypeFilter::Expense, "food"),
            Some(SortKey::Amount),
            SortDirection::Desc,
        );
        let out = list(env.config(), args).await.unwrap();
        assert_eq!(ids(out.structure().unwrap()), [4, 2]);
    }

    #[tokio::test]
    async fn test_list_empty_message() {
        let env = TestEnv::empty().await;
        let out = list(env.config(), ListArgs::default()).await.unwrap();
        assert_eq!(out.message().trim(), render::NO_TRANSACTIONS);
    }
}
