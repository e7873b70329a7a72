//! Router configuration.
//!
//! # Route Table
//!
//! | Method | Path        | Auth     |
//! |--------|-------------|----------|
//! | GET    | `/`         | none     |
//! | GET    | `/health`   | none     |
//! | POST   | `/register` | none     |
//! | POST   | `/login`    | none     |
//! | POST   | `/shorten`  | optional |
//! | GET    | `/urls`     | required |
//! | GET    | `/{code}`   | none     |
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin; `GET`, `POST`, `OPTIONS`
//! - **Authentication** - Bearer credential classification on link routes
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{
    health_handler, index_handler, list_links_handler, login_handler, redirect_handler,
    register_handler, shorten_handler,
};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::http::{Method, header};
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with every route and middleware except path
/// normalization.
pub fn build_router(state: AppState) -> Router {
    let link_routes = Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/urls", get(list_links_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .merge(link_routes)
        .route("/{code}", get(redirect_handler))
        .with_state(state)
        .layer(cors_layer())
        .layer(tracing::layer())
}

/// Constructs the application router served by the binary.
///
/// Wraps [`build_router`] so that `/shorten/` and `/shorten` hit the same route.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
