//! Domain model for the contact/meeting ledger.
//!
//! # Responsibility
//! - Define the canonical entity shapes used by ledger business logic.
//! - Keep identity and append-only rules enforceable at the type level.
//!
//! # Invariants
//! - Every entity is identified by a positive, ledger-allocated integer id.
//! - Identity fields never change after construction; note logs only grow.

pub mod contact;
pub mod meeting;
pub mod state;
