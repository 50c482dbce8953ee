//! Core domain entities.
//!
//! - [`UrlMapping`] - A stored short code to URL mapping
//! - [`NewUrlMapping`] - Input for creating a mapping
//! - [`UrlStats`] - Usage view returned by the stats lookup

pub mod url_mapping;

pub use url_mapping::{NewUrlMapping, UrlMapping, UrlStats};
