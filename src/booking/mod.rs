//! Invitations, bookings and the guard that keeps them consistent.
//!
//! A freelancer holds at most one invitation and one booking per job request,
//! and accepted invitations never push a job request past its requested
//! number of freelancers. The module follows hexagonal architecture:
//!
//! - Domain types and guard rules in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The guard service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
