use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    User,
    Environment,
}

/// What we ask the camera for. Dimensions are ideals; the device may settle
/// on the closest size it supports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConstraints {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub fps: u32,
    pub audio: bool,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::User,
            ideal_width: 640,
            ideal_height: 480,
            fps: 30,
            audio: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// Live state of a video source, sampled before each detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameReadiness {
    pub active: bool,
    pub paused: bool,
    pub ended: bool,
    pub width: u32,
    pub height: u32,
}

impl FrameReadiness {
    pub fn is_ready(&self) -> bool {
        self.active && !self.paused && !self.ended && self.width > 0 && self.height > 0
    }

    pub fn size(&self) -> FrameSize {
        FrameSize {
            width: self.width,
            height: self.height,
        }
    }
}
