//! spendlens reads the income, expense and transfer records of a personal finance tracker and
//! summarizes them per account and per category.
//!
//! The [`engine`] module holds the pure aggregation functions. [`commands`] fetches the records
//! those functions need and renders their results.

mod api;
pub mod args;
pub mod commands;
mod config;
pub mod engine;
mod error;
pub mod model;
mod utils;


pub use api::{Mode, TEST_MODE_ENV};
pub use config::Config;
pub use error::{Error, ErrorType, Result};
