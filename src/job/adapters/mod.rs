//! Adapter implementations for job request ports.

pub mod memory;
pub mod postgres;
