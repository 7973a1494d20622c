// SPDX-License-Identifier: Apache-2.0

mod support;

use dormchef_model::WeekOf;
use dormchef_server::seed_demo;
use dormchef_store::{DEMO_PASSWORD, DEMO_USERS};
use pretty_assertions::assert_eq;
use serde_json::json;
use support::{call, spawn_server};

#[tokio::test]
async fn seeded_demo_account_sees_a_planned_week_and_feed() {
    let server = spawn_server().await;
    let report = seed_demo(&server.state.db, server.state.config.password_rounds)
        .await
        .expect("seed");
    assert!(!report.skipped);
    assert_eq!(report.users, 3);
    assert_eq!(report.recipes, 10);

    let rerun = seed_demo(&server.state.db, 1_000).await.expect("reseed");
    assert!(rerun.skipped);

    let login = call(
        server.addr,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"email": DEMO_USERS[0].1, "password": DEMO_PASSWORD})),
    )
    .await;
    assert_eq!(login.status, 200, "{}", login.body);
    let token = login.json()["token"].as_str().expect("token").to_string();

    let week = WeekOf::current().as_key();
    let plan = call(
        server.addr,
        "GET",
        &format!("/v1/mealplan?weekOf={week}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(plan.json()["items"].as_array().map(Vec::len), Some(6));

    let grocery = call(
        server.addr,
        "POST",
        "/v1/grocery",
        Some(&token),
        Some(json!({"weekOf": week})),
    )
    .await;
    assert!(grocery.json()["totalCost"].as_f64().unwrap_or_default() > 0.0);

    let feed = call(server.addr, "GET", "/v1/feed", Some(&token), None).await;
    let items = feed.json();
    let items = items.as_array().expect("feed");
    assert!(!items.is_empty());
    assert!(items.len() <= 20);
    assert!(items
        .iter()
        .all(|i| i["user"]["name"] != DEMO_USERS[0].0));
}
