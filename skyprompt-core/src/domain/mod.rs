//! Core domain types
//!
//! These types model one generation job end to end: the weather it was
//! composed from, the prompt it produced, and the state the service reports
//! for it. They are shared between the server (which owns job state) and
//! the client/CLI (which render it).

pub mod job;
pub mod prompt;
pub mod weather;
