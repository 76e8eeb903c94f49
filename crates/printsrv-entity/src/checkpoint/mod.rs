//! Reconciliation checkpoint entities.

pub mod model;

pub use model::ReconcilerCheckpoint;
