//! Adapter implementations of the lifecycle ports.

pub mod memory;
