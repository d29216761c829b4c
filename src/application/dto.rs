use serde::{Deserialize, Serialize};

use crate::domain::{geometry::Point, stroke::StrokeStyle};

/// One drawing instruction for the dashboard canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasCommand {
    Clear { width: u32, height: u32 },
    Polyline { points: Vec<Point>, style: StrokeStyle },
}

/// Setup progress shown by the page; `Failed` is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionStatus {
    Starting,
    Running,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailSnapshot {
    pub points: Vec<Point>,
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_commands_are_tagged_for_the_page() {
        let clear = serde_json::to_value(CanvasCommand::Clear { width: 640, height: 480 }).unwrap();
        assert_eq!(clear["type"], "clear");
        assert_eq!(clear["width"], 640);

        let line = serde_json::to_value(CanvasCommand::Polyline {
            points: vec![Point::new(1.0, 2.0)],
            style: StrokeStyle::default(),
        })
        .unwrap();
        assert_eq!(line["type"], "polyline");
        assert_eq!(line["style"]["color"], "aqua");
        assert_eq!(line["style"]["cap"], "round");
        assert_eq!(line["points"][0]["x"], 1.0);
    }

    #[test]
    fn failed_status_carries_message() {
        let status = serde_json::to_value(SessionStatus::Failed { message: "no camera".into() }).unwrap();
        assert_eq!(status["state"], "failed");
        assert_eq!(status["message"], "no camera");
    }
}
