//! # printsrv-database
//!
//! SQLite connection management, the process-wide write serializer, and
//! the repositories behind the durable print queue.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod serializer;
pub mod store;

pub use connection::DatabasePool;
pub use serializer::WriteSerializer;
pub use store::JobStore;
