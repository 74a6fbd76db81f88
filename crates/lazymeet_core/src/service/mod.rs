//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate state mutation, temporal classification and persistence
//!   into the public record-manager API.
//! - Keep callers decoupled from store and codec details.

pub mod ledger;
