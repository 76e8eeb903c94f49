//! Core traits defined in `printsrv-core` and implemented by other crates.

pub mod dispatcher;

pub use dispatcher::{DispatchError, Dispatcher};
