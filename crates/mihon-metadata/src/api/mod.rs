//! Jikan API v4 client implementation.
//!
//! This module provides the client for the Jikan API (MyAnimeList unofficial
//! API) and the fixed-delay rate limiter applied between calls.

pub mod client;
pub mod rate_limiter;
pub mod types;

pub use client::JikanClient;
pub use rate_limiter::RateLimiter;
pub use types::*;
