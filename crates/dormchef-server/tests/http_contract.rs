// SPDX-License-Identifier: Apache-2.0

mod support;

use dormchef_server::ServerConfig;
use pretty_assertions::assert_eq;
use std::time::Duration;
use support::{call, send_raw, spawn_server, spawn_server_with, test_config};

#[tokio::test]
async fn probes_version_and_openapi() {
    let server = spawn_server().await;

    let health = send_raw(server.addr, "GET", "/healthz", &[], None).await;
    assert_eq!(health.status, 200);
    assert_eq!(health.body, "ok");

    let ready = send_raw(server.addr, "GET", "/readyz", &[], None).await;
    assert_eq!(ready.status, 200);

    let version = call(server.addr, "GET", "/v1/version", None, None).await;
    assert_eq!(version.status, 200);
    let json = version.json();
    assert_eq!(json["name"], "dormchef-server");
    assert_eq!(json["schema_version"], 1);

    let openapi = call(server.addr, "GET", "/v1/openapi.json", None, None).await;
    assert_eq!(openapi.status, 200);
    assert_eq!(openapi.json()["openapi"], "3.0.3");
}

#[tokio::test]
async fn request_id_is_echoed_in_header_and_error_body() {
    let server = spawn_server().await;

    let resp = send_raw(
        server.addr,
        "GET",
        "/v1/feed",
        &[("x-request-id", "req-from-client")],
        None,
    )
    .await;
    assert_eq!(resp.status, 401);
    assert_eq!(resp.header("x-request-id").as_deref(), Some("req-from-client"));
    let json = resp.json();
    assert_eq!(json["error"]["code"], "Unauthorized");
    assert_eq!(json["error"]["message"], "Unauthorized");
    assert_eq!(json["error"]["request_id"], "req-from-client");

    let generated = send_raw(server.addr, "GET", "/nope", &[], None).await;
    assert_eq!(generated.status, 404);
    let id = generated.header("x-request-id").expect("generated id");
    assert!(id.starts_with("req-") && id.len() == 20, "{id}");
    assert_eq!(generated.json()["error"]["request_id"], id.as_str());
    assert_eq!(generated.json()["error"]["message"], "Route not found");
}

#[tokio::test]
async fn unsupported_method_uses_the_envelope() {
    let server = spawn_server().await;
    let resp = send_raw(
        server.addr,
        "PUT",
        "/v1/recipes",
        &[("x-request-id", "req-wrong-verb")],
        Some("{}"),
    )
    .await;
    assert_eq!(resp.status, 405);
    assert_eq!(resp.error_code(), "MethodNotAllowed");
    assert_eq!(resp.json()["error"]["details"]["method"], "PUT");
    assert_eq!(resp.json()["error"]["request_id"], "req-wrong-verb");
    assert_eq!(resp.header("x-request-id").as_deref(), Some("req-wrong-verb"));
}

#[tokio::test]
async fn request_deadline_answers_timeout_through_the_full_stack() {
    let server = spawn_server_with(ServerConfig {
        request_timeout_ms: 50,
        ..test_config()
    })
    .await;

    let db = server.state.db.clone();
    let holder = tokio::spawn(async move {
        db.call(|_| {
            std::thread::sleep(Duration::from_millis(800));
            Ok(())
        })
        .await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let resp = send_raw(
        server.addr,
        "GET",
        "/readyz",
        &[("x-request-id", "req-slow-db")],
        None,
    )
    .await;
    assert_eq!(resp.status, 503);
    assert_eq!(resp.header("x-request-id").as_deref(), Some("req-slow-db"));
    let json = resp.json();
    assert_eq!(json["error"]["code"], "Timeout");
    assert_eq!(json["error"]["details"]["timeout_ms"], 50);
    assert_eq!(json["error"]["request_id"], "req-slow-db");

    holder.await.expect("join").expect("held connection");
}

#[tokio::test]
async fn malformed_and_oversized_bodies_use_the_envelope() {
    let server = spawn_server_with(ServerConfig {
        max_body_bytes: 256,
        ..test_config()
    })
    .await;

    let bad = send_raw(
        server.addr,
        "POST",
        "/v1/auth/login",
        &[],
        Some("{\"email\": "),
    )
    .await;
    assert_eq!(bad.status, 400);
    assert_eq!(bad.error_code(), "InvalidBody");

    let big = format!(
        "{{\"email\": \"a@b.dev\", \"password\": \"{}\"}}",
        "x".repeat(1024)
    );
    let too_large = send_raw(server.addr, "POST", "/v1/auth/login", &[], Some(&big)).await;
    assert_eq!(too_large.status, 413);
    assert_eq!(too_large.error_code(), "PayloadTooLarge");
    assert_eq!(too_large.json()["error"]["details"]["max_body_bytes"], 256);
}

#[tokio::test]
async fn invalid_and_expired_tokens_are_rejected() {
    let server = spawn_server_with(ServerConfig {
        session_ttl_secs: 2,
        ..test_config()
    })
    .await;
    let garbage = call(server.addr, "GET", "/v1/auth/me", Some("abc.def"), None).await;
    assert_eq!(garbage.status, 401);

    let account = support::register(server.addr, "Ada", "ada@dormchef.dev").await;
    let fresh = call(server.addr, "GET", "/v1/auth/me", Some(&account.token), None).await;
    assert_eq!(fresh.status, 200);

    tokio::time::sleep(Duration::from_millis(3100)).await;
    let expired = call(server.addr, "GET", "/v1/auth/me", Some(&account.token), None).await;
    assert_eq!(expired.status, 401);
    assert_eq!(expired.error_code(), "Unauthorized");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin_only() {
    let server = spawn_server_with(ServerConfig {
        cors_origins: vec!["http://app.test".to_string()],
        ..test_config()
    })
    .await;
    let allowed = send_raw(
        server.addr,
        "OPTIONS",
        "/v1/recipes",
        &[
            ("Origin", "http://app.test"),
            ("Access-Control-Request-Method", "POST"),
        ],
        None,
    )
    .await;
    assert_eq!(allowed.status, 200);
    assert_eq!(
        allowed.header("access-control-allow-origin").as_deref(),
        Some("http://app.test")
    );

    let denied = send_raw(
        server.addr,
        "OPTIONS",
        "/v1/recipes",
        &[
            ("Origin", "http://evil.test"),
            ("Access-Control-Request-Method", "POST"),
        ],
        None,
    )
    .await;
    assert_eq!(denied.header("access-control-allow-origin"), None);
}
