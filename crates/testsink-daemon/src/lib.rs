//! testsink daemon library.
//!
//! The binary in `main.rs` is a thin shell around these modules so the
//! ingestion flow stays testable without spawning a process.

pub mod cli;
pub mod config;
pub mod coordinator;
