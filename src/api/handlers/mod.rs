//! HTTP request handlers for API endpoints.

pub mod health;
pub mod short_url;

pub use health::health_handler;
pub use short_url::{
    create_handler, delete_handler, redirect_handler, shorten_handler, status_handler,
};
