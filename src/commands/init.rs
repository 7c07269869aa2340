use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` file.
///
/// # Arguments
/// - `home` - The directory that will be the root of data directory, e.g. `$HOME/spendlog`
/// - `seed` - An optional URL or path of the transactions to start with.
///
/// # Errors
/// - Returns an error if the directory is already initialized or any file operation fails.
pub async fn init(home: &Path, seed: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(home, seed)
        .await
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Successfully created the spendlog directory at {}",
        config.root().display()
    )
    .into())
}
