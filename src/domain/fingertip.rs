//! Turns detector output into a single approximate fingertip position.
//!
//! COCO models rarely report a `hand`, so a `person` box stands in for it and
//! a `sports ball` is accepted as a last resort for a small held object.

use super::detection::Detection;
use super::geometry::{BBox, Point};

pub const PREFERRED_LABELS: [&str; 2] = ["person", "hand"];
pub const FALLBACK_LABEL: &str = "sports ball";

/// Fraction of the box height below its top edge where a raised fingertip sits.
pub const FINGERTIP_OFFSET: f32 = 0.1;

/// First preferred region in list order, else the first fallback region.
pub fn select_candidate(dets: &[Detection]) -> Option<&Detection> {
    dets.iter()
        .find(|d| PREFERRED_LABELS.contains(&d.label.as_str()))
        .or_else(|| dets.iter().find(|d| d.label == FALLBACK_LABEL))
}

/// The camera image is shown mirrored, so x is flipped across the surface width.
pub fn fingertip_from_bbox(bbox: &BBox, surface_width: f32) -> Point {
    Point::new(
        surface_width - bbox.center_x(),
        bbox.y + bbox.height * FINGERTIP_OFFSET,
    )
}

pub fn locate_fingertip(dets: &[Detection], surface_width: f32) -> Option<Point> {
    select_candidate(dets).map(|d| fingertip_from_bbox(&d.bbox, surface_width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(label: &str, bbox: BBox) -> Detection {
        Detection::new(label, 0.9, bbox)
    }

    #[test]
    fn mirrors_center_and_offsets_from_top() {
        let p = fingertip_from_bbox(&BBox::new(100.0, 50.0, 60.0, 40.0), 640.0);
        assert_eq!(p, Point::new(510.0, 54.0));
    }

    #[test]
    fn preferred_class_beats_earlier_fallback() {
        let dets = vec![
            det("sports ball", BBox::new(0.0, 0.0, 10.0, 10.0)),
            det("person", BBox::new(100.0, 50.0, 60.0, 40.0)),
        ];
        let chosen = select_candidate(&dets).map(|d| d.label.as_str());
        assert_eq!(chosen, Some("person"));
        assert_eq!(locate_fingertip(&dets, 640.0), Some(Point::new(510.0, 54.0)));
    }

    #[test]
    fn first_preferred_in_list_order_wins() {
        let dets = vec![
            det("cup", BBox::new(0.0, 0.0, 5.0, 5.0)),
            det("hand", BBox::new(200.0, 100.0, 20.0, 20.0)),
            det("person", BBox::new(100.0, 50.0, 60.0, 40.0)),
        ];
        assert_eq!(select_candidate(&dets).map(|d| d.label.as_str()), Some("hand"));
    }

    #[test]
    fn falls_back_to_sports_ball() {
        let dets = vec![
            det("chair", BBox::new(0.0, 0.0, 50.0, 50.0)),
            det("sports ball", BBox::new(300.0, 200.0, 20.0, 20.0)),
        ];
        assert_eq!(locate_fingertip(&dets, 640.0), Some(Point::new(330.0, 202.0)));
    }

    #[test]
    fn nothing_qualifies() {
        let dets = vec![det("laptop", BBox::new(0.0, 0.0, 50.0, 50.0))];
        assert_eq!(locate_fingertip(&dets, 640.0), None);
        assert_eq!(locate_fingertip(&[], 640.0), None);
    }
}
