//! # printsrv-core
//!
//! Core crate for the print server. Contains configuration schemas,
//! typed identifiers, the timestamp codec, the dispatcher trait,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other printsrv crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
