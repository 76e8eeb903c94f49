//! Background retry processing for the print queue.
//!
//! This crate provides:
//! - The scan window algorithm (`window`)
//! - A single reconciliation pass over undelivered entries (`reconciler`)
//! - The tick loop that runs passes until told to stop (`runner`)

pub mod reconciler;
pub mod runner;
pub mod window;

pub use reconciler::{PassReport, Reconciler};
pub use runner::ReconcilerRunner;
pub use window::{ScanWindow, WindowPolicy};
