// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

//! HTTP server: router, shared state, sessions and handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::Router;
use dormchef_api::ApiError;
use dormchef_model::WeekOf;
use dormchef_store::{seed_demo_data, Database, SeedReport, StoreError, DEMO_PASSWORD};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

mod auth;
pub mod config;
mod http;
mod middleware;

pub use auth::{
    hash_password, hash_password_with_salt, verify_password, IssuedToken, MaybeSession, Session,
    SessionKeys, TokenError, DEFAULT_PASSWORD_ROUNDS, PASSWORD_SCHEME,
};
pub use config::{ServerConfig, DEV_SESSION_SECRET};
pub use http::HandlerError;

pub const CRATE_NAME: &str = "dormchef-server";

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ServerConfig>,
    pub sessions: Arc<SessionKeys>,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(db: Database, config: ServerConfig) -> Self {
        let sessions = SessionKeys::new(config.session_secret.as_bytes(), config.session_ttl_secs);
        Self {
            db,
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(60 * 60))
}

async fn route_not_found() -> HandlerError {
    ApiError::not_found("Route").into()
}

async fn method_not_allowed(method: Method) -> HandlerError {
    ApiError::method_not_allowed(method.as_str()).into()
}

pub fn build_router(state: AppState) -> Router {
    use http::{auth_endpoints, feed, meal_plans, ops, recipes, social};

    Router::new()
        .route("/healthz", get(ops::healthz_handler))
        .route("/readyz", get(ops::readyz_handler))
        .route("/v1/version", get(ops::version_handler))
        .route("/v1/openapi.json", get(ops::openapi_handler))
        .route("/v1/auth/register", post(auth_endpoints::register_handler))
        .route("/v1/auth/login", post(auth_endpoints::login_handler))
        .route("/v1/auth/me", get(auth_endpoints::me_handler))
        .route(
            "/v1/recipes",
            get(recipes::list_recipes_handler).post(recipes::create_recipe_handler),
        )
        .route(
            "/v1/recipes/{id}",
            get(recipes::get_recipe_handler).delete(recipes::delete_recipe_handler),
        )
        .route(
            "/v1/follow",
            post(social::follow_handler).delete(social::unfollow_handler),
        )
        .route("/v1/likes", post(social::like_handler))
        .route(
            "/v1/mealplan",
            get(meal_plans::get_meal_plan_handler).post(meal_plans::add_meal_plan_item_handler),
        )
        .route(
            "/v1/mealplan/items/{id}",
            delete(meal_plans::delete_meal_plan_item_handler),
        )
        .route("/v1/grocery", post(meal_plans::grocery_handler))
        .route("/v1/feed", get(feed::feed_handler))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::timeout::request_timeout_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(cors_layer(&state.config))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .with_state(state)
}

/// Loads the demo accounts and recipes, planning the current week.
pub async fn seed_demo(db: &Database, password_rounds: u32) -> Result<SeedReport, StoreError> {
    let hash = tokio::task::spawn_blocking(move || hash_password(DEMO_PASSWORD, password_rounds))
        .await
        .map_err(|e| StoreError::Join(e.to_string()))?;
    db.call(move |conn| seed_demo_data(conn, &hash, WeekOf::current()))
        .await
}
