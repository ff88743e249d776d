//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage calls the person use-cases are built from.
//! - Isolate SQLite and JSON document details from the service layer.
//!
//! # Invariants
//! - Repository writes enforce `Person::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod person_repo;
pub mod query;
