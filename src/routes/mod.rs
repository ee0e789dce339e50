// src/routes/mod.rs
pub mod chat;

use crate::config::AllowedOrigins;
use crate::state::SharedState;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use chat::{chat_handler, health_handler};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
}

/// The complete application: routes, state and the CORS policy from config.
pub fn build_app(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);
    create_router().with_state(state).layer(cors)
}

pub fn cors_layer(allowed: &AllowedOrigins) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match allowed {
        AllowedOrigins::Any => cors.allow_origin(Any),
        AllowedOrigins::List(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("ignoring invalid CORS origin {:?}", origin);
                        None
                    }
                })
                .collect();
            cors.allow_origin(origins)
        }
    }
}
