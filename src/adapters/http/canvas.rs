use tokio::sync::broadcast;

use crate::application::{dto::CanvasCommand, ports::DrawingSurface};
use crate::domain::{geometry::Point, stroke::StrokeStyle};

/// Drawing surface that forwards every command to connected dashboards.
#[derive(Clone)]
pub struct BroadcastCanvas {
    tx: broadcast::Sender<CanvasCommand>,
}

impl BroadcastCanvas {
    pub fn new(tx: broadcast::Sender<CanvasCommand>) -> Self {
        Self { tx }
    }

    fn publish(&self, cmd: CanvasCommand) {
        // Nobody watching is fine; the next frame redraws everything anyway.
        if self.tx.receiver_count() > 0 {
            let _ = self.tx.send(cmd);
        }
    }
}

impl DrawingSurface for BroadcastCanvas {
    fn clear(&self, width: u32, height: u32) {
        self.publish(CanvasCommand::Clear { width, height });
    }

    fn draw_polyline(&self, points: &[Point], style: &StrokeStyle) {
        self.publish(CanvasCommand::Polyline {
            points: points.to_vec(),
            style: style.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commands_reach_subscribers_in_order() {
        let (tx, mut rx) = broadcast::channel(8);
        let canvas = BroadcastCanvas::new(tx);

        canvas.clear(640, 480);
        canvas.draw_polyline(&[Point::new(1.0, 1.0), Point::new(2.0, 2.0)], &StrokeStyle::default());

        assert_eq!(rx.recv().await.unwrap(), CanvasCommand::Clear { width: 640, height: 480 });
        match rx.recv().await.unwrap() {
            CanvasCommand::Polyline { points, style } => {
                assert_eq!(points.len(), 2);
                assert_eq!(style.width, 5.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let (tx, rx) = broadcast::channel(1);
        drop(rx);
        let canvas = BroadcastCanvas::new(tx);
        canvas.clear(10, 10);
    }
}
