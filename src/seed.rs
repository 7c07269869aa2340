//! The seed dataset used to initialize an empty data directory. It is fetched at most once: as
//! soon as the store has been persisted, the seed is never consulted again.

use crate::model::Transaction;
use crate::{utils, Result};
use anyhow::Context;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Something that can produce the initial list of transactions.
#[async_trait::async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Transaction>>;
}

/// Where the seed dataset comes from.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum Seed {
    /// No seed configured; a new store starts empty.
    #[default]
    None,
    /// A JSON array served over HTTP(S).
    Url(Url),
    /// A JSON array in a local file.
    File(PathBuf),
}

impl Seed {
    /// Interprets `s` as an `http`/`https` URL when it parses as one, otherwise as a file path.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return Seed::None;
        }
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Seed::Url(url),
            _ => Seed::File(PathBuf::from(s)),
        }
    }
}

impl Display for Seed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Seed::None => write!(f, "none"),
            Seed::Url(url) => write!(f, "{url}"),
            Seed::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[async_trait::async_trait]
impl SeedSource for Seed {
    async fn fetch(&self) -> Result<Vec<Transaction>> {
        debug!("Fetching seed data from {self}");
        match self {
            Seed::None => Ok(Vec::new()),
            Seed::Url(url) => {
                let body = reqwest::get(url.clone())
                    .await
                    .with_context(|| format!("Unable to reach {url}"))?
                    .error_for_status()
                    .with_context(|| format!("Seed request to {url} failed"))?
                    .text()
                    .await
                    .with_context(|| format!("Unable to read the response from {url}"))?;
                serde_json::from_str(&body)
                    .with_context(|| format!("Failed to parse seed data from {url}"))
            }
            Seed::File(path) => utils::deserialize(path).await,
        }
    }
}
