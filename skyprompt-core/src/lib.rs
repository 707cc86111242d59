//! Skyprompt Core
//!
//! Core types and abstractions shared by the Skyprompt service family.
//!
//! This crate contains:
//! - Domain types: weather snapshots, forecasts, prompt composition and job state
//! - DTOs: request/response bodies exchanged over the HTTP boundary

pub mod domain;
pub mod dto;
