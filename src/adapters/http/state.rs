use std::sync::Arc;
use tokio::sync::{broadcast, watch};

use crate::application::{
    dto::{CanvasCommand, SessionStatus},
    session::TrailSession,
};
use crate::config::AppConfig;

/// Shared state for the axum handlers.
#[derive(Clone)]
pub struct HttpState {
    pub session: Arc<TrailSession>,
    pub config: Arc<AppConfig>,
    /// Drawing commands from the render loop.
    pub canvas: broadcast::Sender<CanvasCommand>,
    /// JPEG frames from the camera, for the page background.
    pub preview: broadcast::Sender<Vec<u8>>,
    pub status: watch::Receiver<SessionStatus>,
}
