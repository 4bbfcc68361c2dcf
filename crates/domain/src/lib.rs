//! Domain layer for the Brainswarm backend.
//!
//! This crate contains:
//! - Domain models (User, Team, Membership, Entry)
//! - The priority engine and access control predicates
//!
//! Everything here is storage-agnostic: services operate on caller-supplied
//! snapshots and attribute sets, never on a database handle.

pub mod models;
pub mod services;
