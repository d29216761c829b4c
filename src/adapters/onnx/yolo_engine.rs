use anyhow::{anyhow, Result};
use image::{imageops::FilterType, RgbImage};
use ndarray::{Array4, ArrayView2};
use ort::session::Session;
use ort::value::Tensor;

use crate::domain::detection::{non_max_suppression, Detection};
use crate::domain::geometry::BBox;
use crate::domain::model::DetectorParams;

const INTRA_THREADS: usize = 4;

pub const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich",
    "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote",
    "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator", "book",
    "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

/// YOLOv8/v11 detection export: one output of shape `[1, 4 + classes, N]`
/// with rows `cx, cy, w, h, score_0, score_1, ...` in network pixels.
pub struct OnnxYoloEngine {
    session: Session,
}

impl OnnxYoloEngine {
    pub fn load(path: &str) -> Result<Self> {
        let session = Session::builder()
            .map_err(|e| anyhow!("{e}"))?
            .with_intra_threads(INTRA_THREADS)
            .map_err(|e| anyhow!("{e}"))?
            .commit_from_file(path)
            .map_err(|e| anyhow!("{path}: {e}"))?;
        Ok(Self { session })
    }

    pub fn infer(&mut self, rgb: &RgbImage, params: &DetectorParams) -> Result<Vec<Detection>> {
        let imgsz = params.input_size as usize;
        let resized = image::imageops::resize(rgb, imgsz as u32, imgsz as u32, FilterType::Nearest);

        let mut input = Array4::<f32>::zeros((1, 3, imgsz, imgsz));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                input[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
            }
        }
        let (data, _) = input.into_raw_vec_and_offset();
        let tensor = Tensor::from_array(([1usize, 3, imgsz, imgsz], data))?;

        let outputs = self.session.run(ort::inputs![tensor])?;
        let (shape, raw) = outputs[0].try_extract_tensor::<f32>()?;
        if shape.len() != 3 {
            return Err(anyhow!("unexpected output rank {}", shape.len()));
        }
        let (channels, candidates) = (shape[1] as usize, shape[2] as usize);
        let view = ArrayView2::from_shape((channels, candidates), raw)?;

        let scale_x = rgb.width() as f32 / imgsz as f32;
        let scale_y = rgb.height() as f32 / imgsz as f32;
        Ok(decode_predictions(view, scale_x, scale_y, params))
    }
}

/// Confidence filter, NMS, then the top `max_detections` by score.
pub fn decode_predictions(
    view: ArrayView2<'_, f32>,
    scale_x: f32,
    scale_y: f32,
    params: &DetectorParams,
) -> Vec<Detection> {
    let (channels, candidates) = view.dim();
    if channels <= 4 {
        return Vec::new();
    }

    let mut dets = Vec::new();
    for i in 0..candidates {
        let best = (4..channels)
            .map(|row| (row - 4, view[[row, i]]))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        let Some((class_id, score)) = best else { continue };
        if score <= params.conf_threshold {
            continue;
        }

        let (cx, cy, w, h) = (view[[0, i]], view[[1, i]], view[[2, i]], view[[3, i]]);
        dets.push(Detection {
            label: COCO_CLASSES.get(class_id).copied().unwrap_or("object").to_string(),
            class_id,
            score,
            bbox: BBox::new((cx - w / 2.0) * scale_x, (cy - h / 2.0) * scale_y, w * scale_x, h * scale_y),
        });
    }

    non_max_suppression(&mut dets, params.iou_threshold);
    dets.truncate(params.max_detections);
    dets
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Builds a `[4 + 33, N]` output so class 32 ("sports ball") is addressable.
    fn output(cols: &[(f32, f32, f32, f32, usize, f32)]) -> Array2<f32> {
        let mut out = Array2::<f32>::zeros((4 + 33, cols.len()));
        for (i, &(cx, cy, w, h, class, score)) in cols.iter().enumerate() {
            out[[0, i]] = cx;
            out[[1, i]] = cy;
            out[[2, i]] = w;
            out[[3, i]] = h;
            out[[4 + class, i]] = score;
        }
        out
    }

    #[test]
    fn boxes_are_scaled_to_source_pixels_and_labelled() {
        let out = output(&[(320.0, 320.0, 64.0, 32.0, 0, 0.9)]);
        let dets = decode_predictions(out.view(), 1.0, 0.75, &DetectorParams::default());

        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].label, "person");
        assert_eq!(dets[0].bbox, BBox::new(288.0, 228.0, 64.0, 24.0));
    }

    #[test]
    fn low_scores_are_dropped_and_order_is_by_score() {
        let out = output(&[
            (100.0, 100.0, 20.0, 20.0, 32, 0.6),
            (400.0, 400.0, 50.0, 50.0, 0, 0.95),
            (200.0, 200.0, 20.0, 20.0, 0, 0.2),
        ]);
        let dets = decode_predictions(out.view(), 1.0, 1.0, &DetectorParams::default());

        let labels: Vec<&str> = dets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["person", "sports ball"]);
    }

    #[test]
    fn max_detections_caps_output() {
        let cols: Vec<_> = (0..30)
            .map(|i| (i as f32 * 30.0 + 10.0, 10.0, 10.0, 10.0, 0, 0.9))
            .collect();
        let params = DetectorParams { max_detections: 5, ..DetectorParams::default() };
        assert_eq!(decode_predictions(output(&cols).view(), 1.0, 1.0, &params).len(), 5);
    }
}
