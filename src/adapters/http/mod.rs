pub mod canvas;
pub mod routes;
pub mod state;
pub mod ws;

use axum::{routing::{get, post}, Router};
use crate::adapters::http::state::HttpState;
use crate::adapters::http::ws::ws_handler;

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/config", get(routes::get_config))
        .route("/api/status", get(routes::get_status))
        .route("/api/trail", get(routes::get_trail))
        .route("/api/clear", post(routes::clear_drawing))
        .route("/ws/stream", get(ws_handler))
        .with_state(state)
}
