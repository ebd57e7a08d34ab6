mod common;

use serde_json::{Value, json};

#[tokio::test]
async fn test_lone_star_blocks_every_request() {
    let server = common::create_test_server(common::create_test_state_with_blocklist(&["*"]));

    let response = server
        .post("/api/v1/short_url")
        .add_header("Host", "127.0.0.1:8080")
        .json(&json!({ "origin_url": "http://ya.ru" }))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "host_blocked");
    assert_eq!(json["error"]["message"], "Host in black list");
    assert_eq!(json["error"]["details"]["host"], "127.0.0.1");
}

#[tokio::test]
async fn test_blocked_request_never_reaches_handler() {
    let state = common::create_test_state_with_blocklist(&["evil.com"]);
    let server = common::create_test_server(state.clone());

    server
        .post("/api/v1/short_url")
        .add_header("Host", "evil.com")
        .json(&json!({ "origin_url": "http://ya.ru" }))
        .await
        .assert_status_bad_request();

    let totals = state.short_url_service.totals().await.unwrap();
    assert_eq!(totals.short_urls, 0);
}

#[tokio::test]
async fn test_wildcard_blocks_subdomains_only() {
    let server = common::create_test_server(common::create_test_state_with_blocklist(&[
        "*.example.com",
    ]));

    let blocked = server
        .get("/api/v1/short_url/zzzzzz")
        .add_header("Host", "a.example.com")
        .await;
    blocked.assert_status_bad_request();
    assert_eq!(blocked.json::<Value>()["error"]["code"], "host_blocked");

    // Apex is not covered by the wildcard; the handler answers instead.
    server
        .get("/api/v1/short_url/zzzzzz")
        .add_header("Host", "example.com")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_port_is_ignored_when_matching() {
    let server = common::create_test_server(common::create_test_state_with_blocklist(&[
        "evil.com",
    ]));

    server
        .get("/api/v1/short_url/zzzzzz")
        .add_header("Host", "evil.com:8080")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_allowed_host_passes_through() {
    let server = common::create_test_server(common::create_test_state_with_blocklist(&[
        "evil.com",
        "*.spam.org",
    ]));

    let response = server
        .post("/api/v1/short_url")
        .add_header("Host", "good.com")
        .json(&json!({ "origin_url": "http://ya.ru" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_is_filtered_too() {
    let server = common::create_test_server(common::create_test_state_with_blocklist(&["*"]));

    server.get("/health").await.assert_status_bad_request();
}
