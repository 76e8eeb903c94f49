//! # printsrv-printer
//!
//! Device adapters for the print queue: a small ESC/POS command builder
//! and a raw TCP [`NetworkPrinter`] implementing
//! [`Dispatcher`](printsrv_core::traits::Dispatcher).

pub mod command;
pub mod network;

pub use command::CommandBuilder;
pub use network::NetworkPrinter;
