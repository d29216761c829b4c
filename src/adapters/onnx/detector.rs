use async_trait::async_trait;
use image::RgbImage;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::adapters::onnx::model_catalog::validate_model;
use crate::adapters::onnx::yolo_engine::OnnxYoloEngine;
use crate::application::ports::{DetectorLoaderPort, ObjectDetector};
use crate::domain::{
    detection::Detection,
    errors::{DomainError, DomainResult},
    model::{DetectorParams, ModelId},
    stream::Frame,
};

pub struct OnnxDetectorLoader {
    model: ModelId,
    params: DetectorParams,
}

impl OnnxDetectorLoader {
    pub fn new(model: ModelId, params: DetectorParams) -> Self {
        Self { model, params }
    }
}

#[async_trait]
impl DetectorLoaderPort for OnnxDetectorLoader {
    async fn load(&self) -> DomainResult<Arc<dyn ObjectDetector>> {
        validate_model(&self.model).map_err(|e| DomainError::ModelLoad(e.to_string()))?;

        let path = self.model.onnx_path.clone();
        let engine = tokio::task::spawn_blocking(move || OnnxYoloEngine::load(&path))
            .await
            .map_err(|e| DomainError::ModelLoad(e.to_string()))?
            .map_err(|e| DomainError::ModelLoad(format!("{e:#}")))?;
        info!("Model {} ready ({})", self.model.name, self.model.onnx_path);

        Ok(Arc::new(OnnxDetector {
            engine: Arc::new(Mutex::new(engine)),
            params: self.params.clone(),
        }))
    }
}

/// Runs inference on the blocking pool so the loops' runtime stays responsive.
pub struct OnnxDetector {
    engine: Arc<Mutex<OnnxYoloEngine>>,
    params: DetectorParams,
}

#[async_trait]
impl ObjectDetector for OnnxDetector {
    async fn detect(&self, frame: &Frame) -> DomainResult<Vec<Detection>> {
        let engine = self.engine.clone();
        let params = self.params.clone();
        let frame = frame.clone();

        tokio::task::spawn_blocking(move || {
            let rgb = RgbImage::from_raw(frame.width, frame.height, frame.rgb.to_vec())
                .ok_or_else(|| DomainError::InvalidInput("frame buffer does not match its size".into()))?;
            let mut engine = engine
                .lock()
                .map_err(|_| DomainError::OperationFailed("inference engine lock poisoned".into()))?;
            engine
                .infer(&rgb, &params)
                .map_err(|e| DomainError::Inference(format!("{e:#}")))
        })
        .await
        .map_err(|e| DomainError::Inference(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_model_is_a_load_failure() {
        let loader = OnnxDetectorLoader::new(
            ModelId { name: "yolo11n".into(), onnx_path: "/nonexistent/yolo11n.onnx".into() },
            DetectorParams::default(),
        );
        let err = loader.load().await.err();
        assert!(matches!(err, Some(ref e) if e.is_fatal()));
    }
}
