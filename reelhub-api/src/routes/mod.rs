/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Liveness and readiness probes
/// - `auth`: Authentication endpoints (register, login)
/// - `brands`: Brand CRUD and brand-scoped video reads
/// - `communities`: Community CRUD and memberships
/// - `groups`: Group CRUD, memberships and messages
/// - `videos`: Video registration, leaderboards and view counting

pub mod health;
pub mod auth;
pub mod brands;
pub mod communities;
pub mod groups;
pub mod videos;
