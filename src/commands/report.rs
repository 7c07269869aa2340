//! Handlers that summarize the stored transactions.

use crate::aggregate::ChartData;
use crate::args::FilterArgs;
use crate::commands::transactions::filter_config;
use crate::commands::{open, Out};
use crate::{render, Config, Result};

/// Lists the distinct categories, preceded by the "all" choice.
pub async fn categories(config: Config) -> Result<Out<Vec<String>>> {
    let controller = open(&config).await?;
    let categories = controller.categories().to_vec();
    Ok(Out::new(render::categories(&categories), categories))
}

/// Totals expenses by category over the filtered transactions. The chart is hidden, and the
/// structure is `None`, when only income is selected.
pub async fn chart(config: Config, args: FilterArgs) -> Result<Out<Option<ChartData>>> {
    let mut controller = open(&config).await?;
    let state = controller.set_filter(filter_config(&args));
    Ok(Out::new(render::chart(state.chart.as_ref()), state.chart))
}
