use axum::{extract::State, response::IntoResponse, Json};

use crate::adapters::http::state::HttpState;
use crate::application::dto::{OkResponse, TrailSnapshot};

pub async fn get_config(State(st): State<HttpState>) -> impl IntoResponse {
    Json(st.config.as_ref().clone())
}

pub async fn get_status(State(st): State<HttpState>) -> impl IntoResponse {
    Json(st.status.borrow().clone())
}

pub async fn get_trail(State(st): State<HttpState>) -> impl IntoResponse {
    Json(TrailSnapshot {
        points: st.session.snapshot(),
        capacity: st.session.capacity(),
    })
}

/// The page's Clear button. The next render frame shows the empty canvas.
pub async fn clear_drawing(State(st): State<HttpState>) -> impl IntoResponse {
    st.session.clear();
    Json(OkResponse { ok: true })
}
