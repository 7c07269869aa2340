//! Configuration file handling for spendlog.
//!
//! The configuration file is stored at `$SPENDLOG_HOME/config.json` and names the storage slot
//! that holds the transactions, where seed data comes from, and the chart colors.

use crate::aggregate::DEFAULT_PALETTE;
use crate::seed::Seed;
use crate::storage::FileStorage;
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "spendlog";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const STORAGE_KEY: &str = "transactions";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SPENDLOG_HOME` and from there it loads `$SPENDLOG_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and an initial `config.json` in it.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/spendlog`
    /// - `seed_source` - An optional URL or file path of a JSON array of transactions used the
    ///   first time the store is loaded.
    ///
    /// # Errors
    /// - Returns an error if a `config.json` already exists in `dir`.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, seed_source: Option<&str>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the spendlog home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let config_file = ConfigFile {
            seed_source: seed_source.map(str::to_string),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `spendlog_home` exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(spendlog_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = spendlog_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The spendlog home directory is missing, run 'spendlog init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'spendlog init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn storage_key(&self) -> &str {
        &self.config_file.storage_key
    }

    /// The storage slot holding the transactions.
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.root, self.storage_key())
    }

    /// The seed source. Relative file paths are resolved against the home directory.
    pub fn seed(&self) -> Seed {
        match self.config_file.seed_source.as_deref().map(Seed::parse) {
            Some(Seed::File(path)) if path.is_relative() => Seed::File(self.root.join(path)),
            Some(seed) => seed,
            None => Seed::None,
        }
    }

    /// The chart colors, falling back to the built-in palette.
    pub fn palette(&self) -> Vec<String> {
        match &self.config_file.palette {
            Some(palette) => palette.clone(),
            None => DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "spendlog",
///   "config_version": 1,
///   "storage_key": "transactions",
///   "seed_source": "https://example.com/transactions.json",
///   "palette": ["#f44336", "#4caf50"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "spendlog"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Name of the storage slot, stored as `<storage_key>.json` next to this file
    #[serde(default = "default_storage_key")]
    storage_key: String,

    /// URL or path of the seed data, used only when no transactions have been stored yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed_source: Option<String>,

    /// Chart colors, assigned to categories in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    palette: Option<Vec<String>>,
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            storage_key: default_storage_key(),
            seed_source: None,
            palette: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or holds invalid settings
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            !config.storage_key.trim().is_empty()
                && !config.storage_key.contains(['/', '\\']),
            "Invalid storage_key in config file: '{}'",
            config.storage_key
        );
        if let Some(palette) = &config.palette {
            ensure!(!palette.is_empty(), "The palette in the config file is empty");
        }

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
