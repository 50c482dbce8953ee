//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgUrlMappingRepository`] - PostgreSQL storage via SQLx
//! - [`InMemoryUrlMappingRepository`] - Process-local storage for development and tests

pub mod memory_url_mapping_repository;
pub mod pg_url_mapping_repository;

pub use memory_url_mapping_repository::InMemoryUrlMappingRepository;
pub use pg_url_mapping_repository::PgUrlMappingRepository;
