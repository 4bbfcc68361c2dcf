use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{auth, entries, export, health, members, teams};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // rate_limit_per_minute = 0 disables rate limiting
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
    };

    let cors = if config.security.cors_origins.is_empty() {
        // Development default: allow any origin
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (Bearer JWT). Middleware order: auth runs first,
    // then per-user rate limiting (which needs the user ID from auth).
    let protected_routes = Router::new()
        // Teams
        .route("/api/v1/teams", post(teams::create_team))
        .route("/api/v1/teams/join", post(teams::join_team))
        .route(
            "/api/v1/teams/:team_id",
            get(teams::get_team)
                .put(teams::update_team)
                .delete(teams::delete_team),
        )
        .route("/api/v1/teams/:team_id/leave", post(teams::leave_team))
        .route(
            "/api/v1/teams/:team_id/invite",
            post(teams::generate_invite)
                .get(teams::get_invite)
                .delete(teams::revoke_invite),
        )
        // Members
        .route("/api/v1/teams/:team_id/members", get(members::list_members))
        .route(
            "/api/v1/teams/:team_id/members/:user_id/role",
            put(members::update_member_role),
        )
        // Entries
        .route(
            "/api/v1/teams/:team_id/entries",
            post(entries::create_entry).get(entries::list_entries),
        )
        .route(
            "/api/v1/teams/:team_id/entries/export",
            get(export::export_entries),
        )
        .route(
            "/api/v1/teams/:team_id/entries/:entry_id",
            get(entries::get_entry)
                .put(entries::update_entry)
                .delete(entries::soft_delete_entry),
        )
        .route(
            "/api/v1/teams/:team_id/entries/:entry_id/restore",
            post(entries::restore_entry),
        )
        .route(
            "/api/v1/teams/:team_id/entries/:entry_id/permanent",
            delete(entries::hard_delete_entry),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
