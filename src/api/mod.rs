use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::AgentClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, StoreAuthService};

mod ai;
pub mod auth;
mod error;
mod extract;
mod observability;
mod premium;
mod system;
mod tools;
mod types;

pub use error::ApiError;
pub use types::*;

pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    /// `None` when the agent is disabled in config.
    pub agent: Option<AgentClient>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

pub fn create_app_state(
    config: Config,
    store: Store,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let agent = if config.agent.enabled {
        Some(AgentClient::new(&config.agent)?)
    } else {
        None
    };

    let auth_service: Arc<dyn AuthService> = Arc::new(StoreAuthService::new(store.clone()));

    Ok(Arc::new(AppState {
        config,
        store,
        auth_service,
        agent,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::from_config(&config);
    create_app_state(config, store, prometheus_handle)
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = &state.config.server.cors_allowed_origins;
    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(auth_routes())
        .merge(system_routes())
        .nest("/api/text", text_routes())
        .nest("/api/calc", calc_routes())
        .merge(premium_routes())
        .route("/ai/chat", post(ai::chat))
        .route("/ai/status", get(ai::status))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/users/me", get(auth::get_current_user))
        .route("/upgrade-premium/{username}", post(auth::upgrade_premium))
        .route("/debug/token-check", get(auth::token_check))
}

fn system_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/status", get(system::auth_status))
        .route("/users", get(system::list_users))
        .route("/api/status", get(system::api_status))
        .route("/metrics", get(system::metrics))
}

fn text_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/operations", get(tools::text_operations))
        .route("/word-count", post(tools::word_count))
        .route("/{operation}", post(tools::transform_text))
}

fn calc_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/evaluate", post(tools::evaluate))
        .route("/add", post(tools::add))
        .route("/multiply", post(tools::multiply))
        .route("/advanced/sqrt", post(tools::sqrt))
        .route("/advanced/power", post(tools::power))
        .route("/advanced/percentage", post(tools::percentage))
        .route("/factorial/{n}", get(tools::factorial))
        .route(
            "/compound-interest/{principal}/{rate}/{time}",
            get(tools::compound_interest),
        )
        .route("/operations", get(tools::calc_operations))
}

fn premium_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/premium/features", get(premium::features))
        .route(
            "/premium/currency-convert/{amount}/{from}/{to}",
            get(premium::currency_convert),
        )
        .route("/premium/analytics", get(premium::analytics))
        .route("/premium/user/stats", get(premium::user_stats))
        .route("/user/analytics", get(premium::user_analytics))
        .route("/user/activity", get(premium::user_activity))
}
