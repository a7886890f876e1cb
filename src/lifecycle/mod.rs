//! Job request lifecycle orchestration.
//!
//! Drives job requests through their status machine, fans invitations out to
//! matching freelancers when a job opens, and completes finished jobs. Every
//! committed change is published as a [`domain::LifecycleEvent`].
//!
//! - Events in [`domain`]
//! - Directory and event sink ports in [`ports`]
//! - In-memory adapters in [`adapters`]
//! - The orchestrator in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
