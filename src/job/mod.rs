//! Job requests and their status machine.
//!
//! A job request is a client's order for one or more freelancers to work a
//! scheduled shift. Its status only moves along the transition table in
//! [`domain::JobTrigger`]. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
