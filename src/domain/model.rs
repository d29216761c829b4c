use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelId {
    pub name: String,      // logical name, e.g. "yolo11n"
    pub onnx_path: String, // filesystem path
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorParams {
    pub input_size: u32,       // square network input, 640 typical
    pub conf_threshold: f32,   // 0..1
    pub iou_threshold: f32,    // 0..1
    pub max_detections: usize,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            conf_threshold: 0.5,
            iou_threshold: 0.5,
            max_detections: 20,
        }
    }
}
