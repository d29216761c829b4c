use std::sync::Arc;

use super::camera::FrameSize;

/// Packed RGB8 pixels of one captured frame. Cloning shares the buffer.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgb: Arc<[u8]>,
}

impl Frame {
    pub fn new(width: u32, height: u32, rgb: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            rgb: rgb.into(),
        }
    }

    pub fn size(&self) -> FrameSize {
        FrameSize {
            width: self.width,
            height: self.height,
        }
    }
}
