//! Domain model for the people store.
//!
//! # Responsibility
//! - Define the canonical `Person` document and its bulk-insert literal.
//!
//! # Invariants
//! - Every stored document is identified by a stable `PersonId`.
//! - Deletion is a hard delete; the store keeps no tombstones.

pub mod person;
