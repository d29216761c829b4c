use std::path::Path;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use crate::application::services::LoopSettings;
use crate::domain::{
    camera::{FacingMode, StreamConstraints},
    model::{DetectorParams, ModelId},
    stroke::StrokeStyle,
};

/// Runtime settings. Every flag can also come from its `FINGERTRAIL_*` variable.
#[derive(Debug, Clone, Parser, Serialize)]
#[command(author, version, about = "Webcam fingertip trail dashboard", long_about = None)]
pub struct AppConfig {
    /// V4L2 device node
    #[arg(long, env = "FINGERTRAIL_CAMERA", default_value = "/dev/video0")]
    pub camera: String,

    /// Capture pixel format (MJPG or YUYV)
    #[arg(long, env = "FINGERTRAIL_FOURCC", default_value = "MJPG")]
    pub fourcc: String,

    #[arg(long, env = "FINGERTRAIL_WIDTH", default_value_t = 640)]
    pub width: u32,

    #[arg(long, env = "FINGERTRAIL_HEIGHT", default_value_t = 480)]
    pub height: u32,

    #[arg(long, env = "FINGERTRAIL_FPS", default_value_t = 30)]
    pub fps: u32,

    /// YOLO detection model exported to ONNX
    #[arg(long, env = "FINGERTRAIL_MODEL", default_value = "models/yolo11n.onnx")]
    pub model: String,

    #[arg(long, env = "FINGERTRAIL_IMGSZ", default_value_t = 640)]
    pub imgsz: u32,

    #[arg(long, env = "FINGERTRAIL_CONF", default_value_t = 0.5)]
    pub conf_thres: f32,

    #[arg(long, env = "FINGERTRAIL_IOU", default_value_t = 0.5)]
    pub iou_thres: f32,

    #[arg(long, env = "FINGERTRAIL_MAX_DET", default_value_t = 20)]
    pub max_det: usize,

    /// Points kept in the trail
    #[arg(long, env = "FINGERTRAIL_TRAIL_LENGTH", default_value_t = 50)]
    pub trail_length: usize,

    /// Minimum time between detection passes
    #[arg(long, env = "FINGERTRAIL_DETECT_MS", default_value_t = 100)]
    pub detection_interval_ms: u64,

    /// Tick period of the detection and render loops
    #[arg(
        long,
        env = "FINGERTRAIL_FRAME_MS",
        default_value_t = 16,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub frame_interval_ms: u64,

    #[arg(long, env = "FINGERTRAIL_BIND", default_value = "0.0.0.0:8090")]
    pub bind: String,

    /// Dashboard page directory
    #[arg(long, env = "FINGERTRAIL_STATIC", default_value = "static")]
    pub static_dir: String,
}

impl AppConfig {
    pub fn constraints(&self) -> StreamConstraints {
        StreamConstraints {
            facing: FacingMode::User,
            ideal_width: self.width,
            ideal_height: self.height,
            fps: self.fps,
            audio: false,
        }
    }

    pub fn model_id(&self) -> ModelId {
        let name = Path::new(&self.model)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        ModelId {
            name,
            onnx_path: self.model.clone(),
        }
    }

    pub fn detector_params(&self) -> DetectorParams {
        DetectorParams {
            input_size: self.imgsz,
            conf_threshold: self.conf_thres,
            iou_threshold: self.iou_thres,
            max_detections: self.max_det,
        }
    }

    pub fn detection_interval(&self) -> Duration {
        Duration::from_millis(self.detection_interval_ms)
    }

    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            constraints: self.constraints(),
            frame_interval: Duration::from_millis(self.frame_interval_ms),
            stroke: StrokeStyle::default(),
        }
    }
}
