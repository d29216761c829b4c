use serde::{Deserialize, Serialize};

use super::geometry::BBox;

/// One region reported by the detector for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub class_id: usize,
    pub score: f32,
    pub bbox: BBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, score: f32, bbox: BBox) -> Self {
        Self {
            label: label.into(),
            class_id: 0,
            score,
            bbox,
        }
    }
}

/// Greedy NMS. Leaves `dets` sorted by descending score, which is also the
/// order the detector hands its list to the trail heuristic.
pub fn non_max_suppression(dets: &mut Vec<Detection>, iou_threshold: f32) {
    dets.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept = 0;
    for index in 0..dets.len() {
        let overlaps = (0..kept).any(|prev| {
            dets[prev].class_id == dets[index].class_id
                && dets[prev].bbox.iou(&dets[index].bbox) > iou_threshold
        });
        if !overlaps {
            dets.swap(kept, index);
            kept += 1;
        }
    }
    dets.truncate(kept);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nms_drops_overlapping_weaker_box() {
        let mut dets = vec![
            Detection::new("person", 0.6, BBox::new(0.0, 0.0, 100.0, 100.0)),
            Detection::new("person", 0.9, BBox::new(2.0, 2.0, 100.0, 100.0)),
            Detection::new("person", 0.7, BBox::new(300.0, 300.0, 50.0, 50.0)),
        ];
        non_max_suppression(&mut dets, 0.5);

        assert_eq!(dets.len(), 2);
        assert_eq!(dets[0].score, 0.9);
        assert_eq!(dets[1].score, 0.7);
    }

    #[test]
    fn nms_keeps_overlapping_boxes_of_different_classes() {
        let mut ball = Detection::new("sports ball", 0.8, BBox::new(0.0, 0.0, 40.0, 40.0));
        ball.class_id = 32;
        let mut dets = vec![
            Detection::new("person", 0.9, BBox::new(0.0, 0.0, 40.0, 40.0)),
            ball,
        ];
        non_max_suppression(&mut dets, 0.5);
        assert_eq!(dets.len(), 2);
    }
}
