/*
 * Responsibility
 * - Tracing setup → Config → filter chain → Router
 * - HTTP-level middleware
 * - axum::serve()
 */
use anyhow::Result;
use axum::Router;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, middleware, services::auth::build_filter_chain, state::AppState};

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let filters = build_filter_chain(&config)?;
    tracing::info!(
        filters = ?filters.filter_names(),
        auth_mode = ?config.auth_mode,
        realm = %config.auth_realm,
        "request filter chain sealed"
    );

    let state = AppState::new(filters);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(address = %config.addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authchain=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let app = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(app, config)
}
