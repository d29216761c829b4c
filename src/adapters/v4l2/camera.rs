use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, error, info, warn};

use crate::adapters::v4l2::capture::{CaptureConfig, V4l2Capture};
use crate::application::ports::{CameraPort, VideoSource};
use crate::domain::{
    camera::{FacingMode, FrameReadiness, FrameSize, StreamConstraints},
    errors::{DomainError, DomainResult},
    stream::Frame,
};

/// Consecutive read failures after which the stream counts as ended.
const MAX_CONSECUTIVE_FAILURES: u32 = 30;

/// Camera backed by a V4L2 device node.
pub struct V4l2Camera {
    device: String,
    fourcc: String,
    preview: broadcast::Sender<Vec<u8>>,
}

impl V4l2Camera {
    pub fn new(device: impl Into<String>, fourcc: impl Into<String>, preview: broadcast::Sender<Vec<u8>>) -> Self {
        Self {
            device: device.into(),
            fourcc: fourcc.into(),
            preview,
        }
    }
}

#[derive(Default)]
struct FeedState {
    readiness: FrameReadiness,
    frame: Option<Frame>,
}

/// Latest frame published by the capture thread.
#[derive(Default)]
struct SharedFeed {
    state: RwLock<FeedState>,
}

impl SharedFeed {
    fn read(&self) -> RwLockReadGuard<'_, FeedState> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, FeedState> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }

    fn activate(&self) {
        self.write().readiness.active = true;
    }

    fn publish(&self, frame: Frame) {
        let mut state = self.write();
        state.readiness.width = frame.width;
        state.readiness.height = frame.height;
        state.frame = Some(frame);
    }

    fn end(&self) {
        let mut state = self.write();
        state.readiness.ended = true;
        state.frame = None;
    }
}

pub struct V4l2VideoSource {
    feed: Arc<SharedFeed>,
}

impl VideoSource for V4l2VideoSource {
    fn readiness(&self) -> FrameReadiness {
        self.feed.read().readiness
    }

    fn current_frame(&self) -> Option<Frame> {
        self.feed.read().frame.clone()
    }
}

#[async_trait]
impl CameraPort for V4l2Camera {
    async fn get_stream(&self, constraints: &StreamConstraints) -> DomainResult<Arc<dyn VideoSource>> {
        if constraints.facing != FacingMode::User {
            debug!("Facing mode is not selectable on v4l2, using {}", self.device);
        }

        let cfg = CaptureConfig {
            camera_path: self.device.clone(),
            fourcc: self.fourcc.clone(),
            width: constraints.ideal_width,
            height: constraints.ideal_height,
            fps: constraints.fps,
        };

        let feed = Arc::new(SharedFeed::default());
        let worker_feed = Arc::downgrade(&feed);
        let preview = self.preview.clone();
        let (opened_tx, opened_rx) = oneshot::channel();

        std::thread::Builder::new()
            .name("v4l2-capture".into())
            .spawn(move || capture_worker(cfg, worker_feed, preview, opened_tx))
            .map_err(|e| DomainError::CameraUnavailable(e.to_string()))?;

        let size = opened_rx
            .await
            .map_err(|_| DomainError::CameraUnavailable("capture thread exited".into()))?
            .map_err(DomainError::CameraUnavailable)?;
        info!("Video stream active: {}x{}", size.width, size.height);

        Ok(Arc::new(V4l2VideoSource { feed }))
    }
}

/// Runs until the video source is dropped or the device keeps failing.
fn capture_worker(
    cfg: CaptureConfig,
    feed: Weak<SharedFeed>,
    preview: broadcast::Sender<Vec<u8>>,
    opened: oneshot::Sender<Result<FrameSize, String>>,
) {
    let mut capture = match V4l2Capture::open(&cfg) {
        Ok(c) => c,
        Err(e) => {
            let _ = opened.send(Err(format!("{}: {e:#}", cfg.camera_path)));
            return;
        }
    };
    if let Some(f) = feed.upgrade() {
        f.activate();
    }
    let _ = opened.send(Ok(capture.size()));

    let mut failures = 0;
    loop {
        let Some(feed) = feed.upgrade() else {
            info!("Video source dropped, closing {}", cfg.camera_path);
            return;
        };

        match capture.next_frame(preview.receiver_count() > 0) {
            Ok(captured) => {
                failures = 0;
                let (w, h) = captured.rgb.dimensions();
                feed.publish(Frame::new(w, h, captured.rgb.into_raw()));
                if let Some(jpeg) = captured.jpeg {
                    let _ = preview.send(jpeg);
                }
            }
            Err(e) => {
                failures += 1;
                warn!("Error capturing frame: {e}");
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    error!("Camera {} stopped delivering frames", cfg.camera_path);
                    feed.end();
                    return;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_reports_readiness_as_frames_arrive() {
        let feed = Arc::new(SharedFeed::default());
        let source = V4l2VideoSource { feed: feed.clone() };
        assert!(!source.readiness().is_ready());

        feed.activate();
        assert!(!source.readiness().is_ready());
        assert!(source.current_frame().is_none());

        feed.publish(Frame::new(2, 1, vec![0u8; 6]));
        assert!(source.readiness().is_ready());
        assert_eq!(source.current_frame().map(|f| f.size()), Some(FrameSize { width: 2, height: 1 }));

        feed.end();
        assert!(!source.readiness().is_ready());
        assert!(source.current_frame().is_none());
    }

    #[tokio::test]
    async fn missing_device_is_camera_unavailable() {
        let (preview, _) = broadcast::channel(1);
        let camera = V4l2Camera::new("/dev/fingertrail-no-such-device", "MJPG", preview);
        let err = camera.get_stream(&StreamConstraints::default()).await.err();
        assert!(matches!(err, Some(DomainError::CameraUnavailable(_))));
    }
}
