//! HTTP middleware for request filtering and observability.

pub mod host_filter;
pub mod tracing;
