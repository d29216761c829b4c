use std::sync::Arc;

use clap::Parser;
use tokio::sync::{broadcast, watch};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use fingertrail::adapters::{
    http::{canvas::BroadcastCanvas, router, state::HttpState},
    onnx::detector::OnnxDetectorLoader,
    v4l2::camera::V4l2Camera,
};
use fingertrail::application::{dto::SessionStatus, services::FingerTrailService, session::TrailSession};
use fingertrail::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logs (RUST_LOG=info by default)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(AppConfig::parse());
    tracing::info!("🔧 Initializing adapters...");

    // 2. Adapters
    let (canvas_tx, _) = broadcast::channel(64);
    let (preview_tx, _) = broadcast::channel(4);
    let (status_tx, status_rx) = watch::channel(SessionStatus::Starting);

    let camera = Arc::new(V4l2Camera::new(&config.camera, &config.fourcc, preview_tx.clone()));
    let loader = Arc::new(OnnxDetectorLoader::new(config.model_id(), config.detector_params()));
    let surface = Arc::new(BroadcastCanvas::new(canvas_tx.clone()));
    let session = Arc::new(TrailSession::new(config.trail_length, config.detection_interval()));

    // 3. Service
    let service = FingerTrailService::new(camera, loader, surface, session.clone(), config.loop_settings());

    // 4. Dashboard first, so a setup failure can still be shown to the user
    let state = HttpState {
        session,
        config: config.clone(),
        canvas: canvas_tx,
        preview: preview_tx,
        status: status_rx,
    };
    let app = router(state).fallback_service(ServeDir::new(&config.static_dir));
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("🚀 Dashboard at http://{}", config.bind);
    tracing::info!("📂 Static files served from '{}'", config.static_dir);

    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    // 5. Camera + model, then both loops
    match service.start().await {
        Ok(running) => {
            status_tx.send_replace(SessionStatus::Running);
            server.await??;
            running.shutdown();
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Setup failed, no loops started: {e}");
            status_tx.send_replace(SessionStatus::Failed { message: e.to_string() });
            server.await??;
            Err(e.into())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
