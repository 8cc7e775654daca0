/// Middleware modules for the API server
///
/// This module contains custom middleware for:
/// - Rate limiting on authentication endpoints

pub mod rate_limit;
