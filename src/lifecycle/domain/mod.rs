//! Domain events emitted by the job request lifecycle.

mod event;

pub use event::{LifecycleEvent, LifecycleEventKind};
