//! Adapter implementations of the booking repository port.

pub mod memory;
pub mod postgres;
