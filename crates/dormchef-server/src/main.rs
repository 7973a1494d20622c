// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

use dormchef_server::{build_router, seed_demo, AppState, ServerConfig};
use dormchef_store::Database;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = ServerConfig::from_env();
    init_tracing(config.log_json);
    config.validate()?;
    if config.session_secret_is_default {
        warn!("DORMCHEF_SESSION_SECRET is unset; using the development secret");
    }

    let db = Database::open(&config.db_path)
        .map_err(|e| format!("open database {}: {e}", config.db_path.display()))?;
    info!(db_path = %config.db_path.display(), "database ready");

    if config.seed_demo {
        match seed_demo(&db, config.password_rounds).await {
            Ok(report) if report.skipped => info!("demo data already present"),
            Ok(report) => info!(
                users = report.users,
                recipes = report.recipes,
                plan_items = report.plan_items,
                "demo data seeded"
            ),
            Err(e) => error!("demo seed failed: {e}"),
        }
    }

    let bind_addr = config.bind.clone();
    let state = AppState::new(db, config);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!(bind = %bind_addr, "dormchef server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))?;
    info!("server stopped");
    Ok(())
}
