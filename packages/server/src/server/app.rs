//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router
///
/// All API routes live under /api; /health is unauthenticated and outside
/// the rate limiter so load balancers can probe it freely.
pub fn build_app(
    pool: PgPool,
    jwt_secret: &str,
    jwt_issuer: String,
    frontend_url: Option<String>,
) -> Router {
    let jwt_service = Arc::new(JwtService::new(jwt_secret, jwt_issuer));

    let app_state = AppState {
        db_pool: pool,
        jwt_service: jwt_service.clone(),
    };

    // CORS: lock to the configured frontend origin when one is set,
    // otherwise stay open for local development
    let cors = match frontend_url.as_deref().and_then(|url| url.parse::<HeaderValue>().ok()) {
        Some(origin) => CorsLayer::new().allow_origin(origin),
        None => CorsLayer::new().allow_origin(tower_http::cors::Any),
    }
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
    .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Rate limiting: 10 requests per second per IP with bursts up to 20
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers()
            .finish()
            .expect("Rate limiter configuration is valid and should never fail"),
    );

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let api = Router::new()
        .route("/health", get(routes::health::health_handler))
        .nest("/auth", routes::auth::router())
        .nest("/reports", routes::reports::router())
        .nest("/ngos", routes::ngos::router())
        .nest("/volunteers", routes::volunteers::router())
        .nest("/triage", routes::triage::router())
        .nest("/donations", routes::donations::router())
        .nest("/sponsorships", routes::donations::sponsorships_router())
        .nest("/adoptions", routes::adoptions::router())
        .nest("/dashboard", routes::dashboard::router())
        .nest("/contact", routes::contact::router())
        .layer(rate_limit_layer);

    Router::new()
        .route("/health", get(routes::health::health_handler))
        .nest("/api", api)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
