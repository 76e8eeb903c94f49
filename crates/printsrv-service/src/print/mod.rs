//! Print job submission.

pub mod service;

pub use service::{PrintService, SubmitReceipt};
