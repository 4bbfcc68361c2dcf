//! Persistence layer for the Brainswarm backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - SQL migrations (embedded, run at startup)

pub mod db;
pub mod entities;
pub mod repositories;
