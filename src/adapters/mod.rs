pub mod http;
#[cfg(feature = "onnx")]
pub mod onnx;
#[cfg(feature = "camera")]
pub mod v4l2;
