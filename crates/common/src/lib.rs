//! Common utilities and shared types for photoshare.
//!
//! This crate provides the pieces every other photoshare crate leans on:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//!
//! # Example
//!
//! ```no_run
//! use photoshare_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Database: {}", config.database.url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;

pub use config::{Config, DatabaseConfig};
pub use error::{AppError, AppResult};
