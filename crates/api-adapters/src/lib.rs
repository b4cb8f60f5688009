//! # api-adapters
//!
//! The web routing and rendering layer for prompt-board.

pub mod extract;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod views;

use axum::routing::{get, post};
use axum::Router;

pub use state::AppState;

/// Routes for the catalog.
///
/// The binary adds static files, tracing and request-id layers on top.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/add", get(handlers::add_form).post(handlers::add_prompt))
        .route(
            "/edit/{id}",
            get(handlers::edit_form).post(handlers::edit_prompt),
        )
        .route("/delete/{id}", post(handlers::delete_prompt))
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .with_state(state)
}
