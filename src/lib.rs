//! spendlog records income and expenses in a local JSON file and derives filtered, sorted views
//! and per-category expense totals from them.

pub mod aggregate;
pub mod args;
pub mod categories;
pub mod commands;
mod config;
pub mod controller;
mod error;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod seed;
pub mod storage;
pub mod store;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use controller::{Controller, RenderState};
pub use error::{Error, Result, ValidationError, FILL_ALL_FIELDS};
