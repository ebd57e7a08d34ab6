//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! with `mockall` for unit tests.
//!
//! # Testing
//!
//! See `tests/repository_short_url.rs` for the PostgreSQL implementation and
//! `tests/handler_*.rs` for the in-memory one.

pub mod short_url_repository;

pub use short_url_repository::{Resolution, ShortUrlRepository, UsageTotals};

#[cfg(test)]
pub use short_url_repository::MockShortUrlRepository;
