//! These structs provide the CLI interface for the spendlog CLI.

use crate::model::{TransactionForm, TransactionType};
use crate::pipeline::{SortDirection, SortKey, TypeFilter};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// spendlog: A command-line tool for recording income and expenses.
///
/// Transactions are kept in a single JSON file in your data directory. You can list them with
/// filters and sorting, see which categories you have used, and see where your money goes as a
/// per-category breakdown of expenses.
///
/// Start with `spendlog init`, optionally pointing --seed at a JSON file or URL holding the
/// transactions you want to start with.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    Init(InitArgs),
    /// Record a new income or expense.
    Add(AddArgs),
    /// Delete a transaction by its ID.
    Delete(DeleteArgs),
    /// List transactions, optionally filtered and sorted.
    List(ListArgs),
    /// List the categories in use.
    Categories,
    /// Show expense totals by category.
    Chart(FilterArgs),
    /// Start an interactive session that keeps filters and sorting between commands.
    Shell,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where spendlog data and configuration is held. Defaults to ~/spendlog
    #[arg(long, env = "SPENDLOG_HOME", default_value_t = default_spendlog_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `spendlog init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// A URL or file path of a JSON array of transactions to start with. It is read the first
    /// time spendlog runs and never again.
    #[arg(long)]
    seed: Option<String>,
}

impl InitArgs {
    pub fn new(seed: Option<String>) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> Option<&str> {
        self.seed.as_deref()
    }
}

/// Args for the `spendlog add` command. Values are validated by the store, not by the parser,
/// so that the CLI and the shell report problems the same way.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What the money was for.
    #[arg(long)]
    title: String,

    /// A positive amount, e.g. 12.50
    #[arg(long)]
    amount: String,

    /// Whether the money came in or went out.
    #[arg(long = "type", value_enum)]
    r#type: TransactionType,

    /// The date in YYYY-MM-DD format.
    #[arg(long)]
    date: String,

    /// Any category name, e.g. food
    #[arg(long)]
    category: String,
}

impl AddArgs {
    pub fn new(
        title: impl Into<String>,
        amount: impl Into<String>,
        r#type: TransactionType,
        date: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            amount: amount.into(),
            r#type,
            date: date.into(),
            category: category.into(),
        }
    }

    pub fn form(&self) -> TransactionForm {
        TransactionForm::new(
            self.title.as_str(),
            self.amount.as_str(),
            self.r#type.to_string(),
            self.date.as_str(),
            self.category.as_str(),
        )
    }
}

/// Args for the `spendlog delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ID shown in the first column of `spendlog list`.
    id: i64,
}

impl DeleteArgs {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

/// The type and category filters.
#[derive(Debug, Default, Parser, Clone)]
pub struct FilterArgs {
    /// Show only this type of transaction.
    #[arg(long = "type", value_enum, default_value_t = TypeFilter::All)]
    r#type: TypeFilter,

    /// Show only this category, or "all".
    #[arg(long, default_value = "all")]
    category: String,
}

impl FilterArgs {
    pub fn new(r#type: TypeFilter, category: impl Into<String>) -> Self {
        Self {
            r#type,
            category: category.into(),
        }
    }

    pub fn r#type(&self) -> TypeFilter {
        self.r#type
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Args for the `spendlog list` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ListArgs {
    #[clap(flatten)]
    filter: FilterArgs,

    /// Sort by this field. Without it, transactions are listed in the order they were added.
    #[arg(long, value_enum)]
    sort: Option<SortKey>,

    /// The sort direction.
    #[arg(long, value_enum, default_value_t = SortDirection::Desc)]
    direction: SortDirection,
}

impl ListArgs {
    pub fn new(filter: FilterArgs, sort: Option<SortKey>, direction: SortDirection) -> Self {
        Self {
            filter,
            sort,
            direction,
        }
    }

    pub fn filter(&self) -> &FilterArgs {
        &self.filter
    }

    pub fn sort(&self) -> Option<SortKey> {
        self.sort
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

fn default_spendlog_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("spendlog"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or SPENDLOG_HOME instead of relying on the default \
                spendlog home directory.",
            );
            PathBuf::from("spendlog")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
