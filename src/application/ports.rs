use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    camera::{FrameReadiness, StreamConstraints},
    detection::Detection,
    errors::DomainResult,
    geometry::Point,
    stream::Frame,
    stroke::StrokeStyle,
};

#[async_trait]
pub trait CameraPort: Send + Sync {
    /// Opens the stream once. Errors are fatal for the session.
    async fn get_stream(&self, constraints: &StreamConstraints) -> DomainResult<Arc<dyn VideoSource>>;
}

pub trait VideoSource: Send + Sync {
    fn readiness(&self) -> FrameReadiness;
    fn current_frame(&self) -> Option<Frame>;
}

#[async_trait]
pub trait DetectorLoaderPort: Send + Sync {
    async fn load(&self) -> DomainResult<Arc<dyn ObjectDetector>>;
}

#[async_trait]
pub trait ObjectDetector: Send + Sync {
    /// Regions in the detector's own order (descending score).
    async fn detect(&self, frame: &Frame) -> DomainResult<Vec<Detection>>;
}

pub trait DrawingSurface: Send + Sync {
    fn clear(&self, width: u32, height: u32);
    fn draw_polyline(&self, points: &[Point], style: &StrokeStyle);
}
