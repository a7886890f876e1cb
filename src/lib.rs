//! Shiftwork: booking lifecycle for a staffing marketplace.
//!
//! Clients post job requests for freelancers to work scheduled shifts.
//! This crate tracks each job request through its status machine, keeps
//! invitations and bookings consistent under concurrent use, and publishes
//! lifecycle events for notification collaborators.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`job`]: Job requests and their status machine
//! - [`booking`]: Invitations, bookings and the consistency guard
//! - [`lifecycle`]: Orchestration and lifecycle events
//! - [`config`]: Marketplace booking policy

pub mod booking;
pub mod config;
pub mod job;
pub mod lifecycle;
