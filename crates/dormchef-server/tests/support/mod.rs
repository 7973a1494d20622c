// SPDX-License-Identifier: Apache-2.0
#![allow(dead_code)]

use dormchef_server::{build_router, AppState, ServerConfig};
use dormchef_store::Database;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
}

/// Fast key stretching keeps registration cheap in tests.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        password_rounds: 1_000,
        ..ServerConfig::default()
    }
}

pub async fn spawn_server() -> TestServer {
    spawn_server_with(test_config()).await
}

pub async fn spawn_server_with(config: ServerConfig) -> TestServer {
    let db = Database::open_in_memory().expect("open database");
    let state = AppState::new(db, config);
    let app = build_router(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    TestServer { addr, state }
}

#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub head: String,
    pub body: String,
}

impl RawResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("response is not json ({e}): {}", self.body))
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case(name)
                .then(|| v.trim().to_string())
        })
    }

    pub fn error_code(&self) -> String {
        self.json()["error"]["code"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}

pub async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> RawResponse {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    if let Some(body) = body {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    req.push_str("\r\n");
    if let Some(body) = body {
        req.push_str(body);
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    RawResponse {
        status,
        head: head.to_string(),
        body: body.to_string(),
    }
}

/// JSON request with an optional bearer token.
pub async fn call(
    addr: SocketAddr,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> RawResponse {
    let auth = token.map(|t| format!("Bearer {t}"));
    let mut headers = Vec::new();
    if let Some(auth) = &auth {
        headers.push(("Authorization", auth.as_str()));
    }
    let body = body.map(|b| b.to_string());
    send_raw(addr, method, path, &headers, body.as_deref()).await
}

pub struct Account {
    pub id: String,
    pub token: String,
}

pub async fn register(addr: SocketAddr, name: &str, email: &str) -> Account {
    let resp = call(
        addr,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({"name": name, "email": email, "password": "password123"})),
    )
    .await;
    assert_eq!(resp.status, 200, "register failed: {}", resp.body);
    let json = resp.json();
    Account {
        id: json["user"]["id"].as_str().expect("user id").to_string(),
        token: json["token"].as_str().expect("token").to_string(),
    }
}

pub fn recipe_body(title: &str, tags: &[&str]) -> Value {
    json!({
        "title": title,
        "cookTimeMin": 10,
        "servings": 2,
        "tags": tags,
        "steps": ["Cook it"],
        "ingredients": [
            {"name": "Chicken Breast", "qty": 1.5, "unit": "lb", "approxPrice": 4.0},
            {"name": "Rice", "qty": 1, "unit": "cup", "approxPrice": 0.5}
        ]
    })
}

pub async fn create_recipe(addr: SocketAddr, token: &str, title: &str, tags: &[&str]) -> String {
    let resp = call(
        addr,
        "POST",
        "/v1/recipes",
        Some(token),
        Some(recipe_body(title, tags)),
    )
    .await;
    assert_eq!(resp.status, 200, "create recipe failed: {}", resp.body);
    resp.json()["id"].as_str().expect("recipe id").to_string()
}
