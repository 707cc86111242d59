//! Service Module
//!
//! Business logic layer for the server.
//! The runner executes a single generation job; the manager owns the shared
//! job state and supervises runner tasks.

pub mod manager;
pub mod runner;

pub use manager::JobManager;
pub use runner::{JobError, JobRunner};
