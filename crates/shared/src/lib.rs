//! Shared utilities and common types for the Brainswarm backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT token generation and validation
//! - Password hashing with Argon2id
//! - Team code and invite token generation
//! - Common validation logic

pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
