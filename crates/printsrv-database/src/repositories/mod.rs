//! Concrete repository implementations for the queue store tables.

pub mod checkpoint;
pub mod queue;

pub use checkpoint::CheckpointRepository;
pub use queue::QueueRepository;
