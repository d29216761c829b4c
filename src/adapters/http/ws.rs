use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::adapters::http::state::HttpState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(st): State<HttpState>) -> impl axum::response::IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, st))
}

/// Text frames carry canvas commands as JSON, binary frames carry JPEG video.
async fn handle_socket(mut socket: WebSocket, st: HttpState) {
    let mut canvas_rx = st.canvas.subscribe();
    let mut preview_rx = st.preview.subscribe();

    loop {
        let msg = tokio::select! {
            cmd = canvas_rx.recv() => match cmd {
                Ok(cmd) => match serde_json::to_string(&cmd) {
                    Ok(json) => Message::Text(json),
                    Err(e) => {
                        warn!("Failed to encode canvas command: {e}");
                        continue;
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "dashboard lagging behind canvas");
                    continue;
                }
                Err(RecvError::Closed) => break,
            },
            jpeg = preview_rx.recv() => match jpeg {
                Ok(jpeg) => Message::Binary(jpeg),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
        };

        if socket.send(msg).await.is_err() {
            break;
        }
    }
}
