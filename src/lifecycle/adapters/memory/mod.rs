//! In-memory directory and event sink adapters.

mod directory;
mod events;

pub use directory::{FreelancerProfile, InMemoryFreelancerDirectory, ShiftBand};
pub use events::{BroadcastEventSink, RecordingEventSink};
