//! Command handlers for the spendlog CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod init;
mod report;
mod shell;
mod transactions;

use crate::controller::Controller;
use crate::storage::FileStorage;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use tracing::debug;

pub use init::init;
pub use report::{categories, chart};
pub use shell::{parse_line, run_shell, shell, ShellCommand};
pub use transactions::{add, delete, list};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to stdout and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        let message = self.message.trim_end();
        if !message.is_empty() {
            println!("{message}");
        }
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Loads the transactions of `config` into a new `Controller`.
async fn open(config: &Config) -> Result<Controller<FileStorage>> {
    Controller::start(config.storage(), &config.seed(), config.palette()).await
}
