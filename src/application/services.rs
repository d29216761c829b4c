use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::{
    application::{
        ports::{CameraPort, DetectorLoaderPort, DrawingSurface, ObjectDetector, VideoSource},
        session::{DetectionOutcome, TrailSession},
    },
    domain::{
        camera::{FrameSize, StreamConstraints},
        errors::{DomainError, DomainResult},
        fingertip::locate_fingertip,
        geometry::Point,
        stroke::StrokeStyle,
    },
};

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub constraints: StreamConstraints,
    /// Cadence of both loops, one display refresh.
    pub frame_interval: Duration,
    pub stroke: StrokeStyle,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            constraints: StreamConstraints::default(),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            stroke: StrokeStyle::default(),
        }
    }
}

/// What a single detection tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PassResult {
    NotReady,
    Throttled,
    Tracked(Point),
    Lost,
    /// Inference failed; the trail is treated as lost and the loop goes on.
    Failed,
}

/// Everything both loops need once setup has succeeded.
pub struct TrailPipeline {
    source: Arc<dyn VideoSource>,
    detector: Arc<dyn ObjectDetector>,
    surface: Arc<dyn DrawingSurface>,
    session: Arc<TrailSession>,
    canvas: FrameSize,
    style: StrokeStyle,
}

impl TrailPipeline {
    pub fn new(
        source: Arc<dyn VideoSource>,
        detector: Arc<dyn ObjectDetector>,
        surface: Arc<dyn DrawingSurface>,
        session: Arc<TrailSession>,
        canvas: FrameSize,
        style: StrokeStyle,
    ) -> Self {
        Self {
            source,
            detector,
            surface,
            session,
            canvas,
            style,
        }
    }

    pub fn session(&self) -> &Arc<TrailSession> {
        &self.session
    }

    pub fn canvas(&self) -> FrameSize {
        self.canvas
    }

    pub async fn detection_tick(&self) -> PassResult {
        // 1. Source must be live; this is retried next tick, not an error
        if !self.source.readiness().is_ready() {
            return PassResult::NotReady;
        }
        let Some(frame) = self.source.current_frame() else {
            return PassResult::NotReady;
        };

        // 2. Throttle
        if !self.session.try_begin_pass(Instant::now().into_std()) {
            return PassResult::Throttled;
        }

        // 3. Inference + heuristic
        let (outcome, result) = match self.detector.detect(&frame).await {
            Ok(dets) => match locate_fingertip(&dets, self.canvas.width as f32) {
                Some(p) => (DetectionOutcome::Tracked(p), PassResult::Tracked(p)),
                None => (DetectionOutcome::Lost, PassResult::Lost),
            },
            Err(e) => {
                error!("Error during detection: {e}");
                (DetectionOutcome::Lost, PassResult::Failed)
            }
        };

        // 4. Commit before the next pass is scheduled
        self.session.apply(outcome);
        result
    }

    /// Returns whether a polyline was drawn.
    pub fn render_tick(&self) -> bool {
        let points = self.session.snapshot();
        self.surface.clear(self.canvas.width, self.canvas.height);
        if points.len() < 2 {
            return false;
        }
        self.surface.draw_polyline(&points, &self.style);
        true
    }
}

/// Handles to the two running loops.
pub struct RunningTrail {
    pipeline: Arc<TrailPipeline>,
    detection: JoinHandle<()>,
    render: JoinHandle<()>,
}

impl RunningTrail {
    pub fn pipeline(&self) -> &Arc<TrailPipeline> {
        &self.pipeline
    }

    pub fn shutdown(self) {
        self.detection.abort();
        self.render.abort();
    }
}

/// Setup and loop orchestration.
#[derive(Clone)]
pub struct FingerTrailService {
    camera: Arc<dyn CameraPort>,
    loader: Arc<dyn DetectorLoaderPort>,
    surface: Arc<dyn DrawingSurface>,
    session: Arc<TrailSession>,
    settings: LoopSettings,
}

impl FingerTrailService {
    pub fn new(
        camera: Arc<dyn CameraPort>,
        loader: Arc<dyn DetectorLoaderPort>,
        surface: Arc<dyn DrawingSurface>,
        session: Arc<TrailSession>,
        settings: LoopSettings,
    ) -> Self {
        Self {
            camera,
            loader,
            surface,
            session,
            settings,
        }
    }

    pub fn session(&self) -> &Arc<TrailSession> {
        &self.session
    }

    /// Acquires the camera, sizes the canvas from the first frame metadata,
    /// loads the model, then starts both loops. Any error here is fatal and
    /// leaves no loop running.
    pub async fn start(&self) -> DomainResult<RunningTrail> {
        let source = self.camera.get_stream(&self.settings.constraints).await?;

        let canvas = self.wait_for_metadata(source.as_ref()).await?;
        info!(
            "Canvas and video dimensions set to: {}x{}",
            canvas.width, canvas.height
        );

        info!("Loading detection model...");
        let detector = self.loader.load().await?;
        info!("Detection model loaded");

        let pipeline = Arc::new(TrailPipeline::new(
            source,
            detector,
            self.surface.clone(),
            self.session.clone(),
            canvas,
            self.settings.stroke.clone(),
        ));

        let period = self.settings.frame_interval;
        let detection = tokio::spawn(detection_loop(pipeline.clone(), period));
        let render = tokio::spawn(render_loop(pipeline.clone(), period));

        Ok(RunningTrail {
            pipeline,
            detection,
            render,
        })
    }

    async fn wait_for_metadata(&self, source: &dyn VideoSource) -> DomainResult<FrameSize> {
        loop {
            let readiness = source.readiness();
            if readiness.width > 0 && readiness.height > 0 {
                return Ok(readiness.size());
            }
            if readiness.ended {
                return Err(DomainError::CameraUnavailable(
                    "stream ended before delivering a frame".into(),
                ));
            }
            tokio::time::sleep(self.settings.frame_interval).await;
        }
    }
}

async fn detection_loop(pipeline: Arc<TrailPipeline>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        pipeline.detection_tick().await;
    }
}

async fn render_loop(pipeline: Arc<TrailPipeline>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        pipeline.render_tick();
    }
}
