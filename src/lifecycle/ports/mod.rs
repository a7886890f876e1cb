//! Ports the lifecycle orchestrator depends on.

mod directory;
mod events;

pub use directory::{FreelancerDirectory, FreelancerDirectoryError, FreelancerDirectoryResult};
pub use events::{EventSink, EventSinkError, EventSinkResult};
