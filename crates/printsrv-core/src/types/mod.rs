//! Core type definitions used across the printsrv workspace.

pub mod id;
pub mod timestamp;

pub use id::EntryId;
pub use timestamp::Timestamp;
