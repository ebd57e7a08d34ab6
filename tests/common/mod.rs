#![allow(dead_code)]

use axum::Router;
use axum::extract::connect_info::MockConnectInfo;
use axum_test::TestServer;
use std::net::SocketAddr;
use std::sync::Arc;
use urler::api::middleware::host_filter::HostBlocklist;
use urler::infrastructure::persistence::MemoryShortUrlRepository;
use urler::routes::router;
use urler::state::AppState;
use urler::utils::alias::AliasGenerator;

pub const CLIENT_ADDR: &str = "127.0.0.1:12345";

pub fn test_aliases() -> AliasGenerator {
    AliasGenerator::new("http", "127.0.0.1", 8080)
}

pub fn create_test_state() -> AppState {
    create_test_state_with_blocklist(&[])
}

pub fn create_test_state_with_blocklist(patterns: &[&str]) -> AppState {
    let blocklist = HostBlocklist::new(patterns.iter().copied()).unwrap();

    AppState::new(
        Arc::new(MemoryShortUrlRepository::new()),
        test_aliases(),
        blocklist,
    )
}

/// Full router with a fixed peer address in place of a real socket.
pub fn create_test_app(state: AppState) -> Router {
    let addr: SocketAddr = CLIENT_ADDR.parse().unwrap();
    router(state).layer(MockConnectInfo(addr))
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(create_test_app(state)).unwrap()
}

/// Extracts the short form from a generated short URL.
pub fn short_form_of(short_url: &str) -> String {
    short_url.rsplit('/').next().unwrap().to_string()
}
