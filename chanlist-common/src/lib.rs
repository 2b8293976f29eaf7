//! # chanlist Common Library
//!
//! Shared code for the chanlist crates:
//! - Configuration loading (TOML file, environment, compiled defaults)
//! - Common error type
//! - Logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
