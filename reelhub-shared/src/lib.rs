//! # ReelHub Shared Library
//!
//! This crate contains the types, storage layer, and business logic shared by
//! the ReelHub API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and the queries that operate on them
//! - `auth`: Password hashing and JWT session tokens
//! - `cache`: Redis client and read-through caching for aggregations
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod cache;
pub mod db;
pub mod models;

/// Current version of the ReelHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
