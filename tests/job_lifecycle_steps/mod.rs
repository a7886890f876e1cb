//! Step definitions for job lifecycle scenarios.

mod given;
mod then;
pub mod world;
