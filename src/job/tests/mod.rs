//! Unit tests for the job module.
