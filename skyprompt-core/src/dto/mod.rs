//! Data Transfer Objects for the HTTP boundary
//!
//! Lightweight request/response bodies for the `/prompt` endpoints.

pub mod prompt;
