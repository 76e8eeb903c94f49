//! # printsrv-entity
//!
//! Row models for the print queue store. Every struct in this crate maps
//! one table row and derives `Debug`, `Clone`, `Serialize`, `Deserialize`,
//! and `sqlx::FromRow`.

pub mod checkpoint;
pub mod queue;
