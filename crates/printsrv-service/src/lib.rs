//! # printsrv-service
//!
//! Producer-side service layer. A request handler hands a job to
//! [`PrintService`], which persists it before attempting delivery and
//! records the outcome so the reconciler can pick up anything undelivered.
//!
//! Services follow constructor injection. All dependencies are provided
//! at construction time via `Arc` references.

pub mod print;

pub use print::{PrintService, SubmitReceipt};
