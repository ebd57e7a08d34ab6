//! Helper functions shared across layers.
//!
//! - [`alias`] - Short form generation and short URL composition
//! - [`extract_host`] - Host extraction from HTTP requests

pub mod alias;
pub mod extract_host;
