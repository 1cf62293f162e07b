//! meishi-server - REST API server for meishi.
//!
//! This crate exposes the card-scanning pipeline over HTTP: photos are posted
//! as raw bytes, every card found is saved for the calling user, and saved
//! cards can be listed, searched and deleted.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use meishi_core::InMemoryCardStore;
//! use meishi_server::{create_pipeline, create_server, load_config, AppState, ServerSettings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = load_config(None).unwrap();
//!     let pipeline = create_pipeline(&config).unwrap();
//!     let state = AppState::new(pipeline, Arc::new(InMemoryCardStore::new()), ServerSettings::from_env());
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod error;
pub mod factory;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use factory::{create_pipeline, load_config};
pub use state::{AppState, ServerSettings};

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}

/// Create the server with authentication middleware.
pub fn create_server_with_auth(state: AppState) -> Router {
    routes::create_router(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
