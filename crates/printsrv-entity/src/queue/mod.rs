//! Print queue entities.

pub mod model;

pub use model::QueueEntry;
