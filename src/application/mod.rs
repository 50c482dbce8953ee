//! Application layer services implementing business logic.
//!
//! Services consume the repository trait and a [`crate::domain::clock::Clock`]
//! and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::ShortenService`] - Alias reservation and derived code allocation
//! - [`services::ResolveService`] - Expiration-aware resolution and click counting
//! - [`services::SweepService`] - Deletion of expired mappings

pub mod services;
