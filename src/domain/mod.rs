pub mod camera;
pub mod detection;
pub mod errors;
pub mod fingertip;
pub mod geometry;
pub mod model;
pub mod stream;
pub mod stroke;
pub mod throttle;
pub mod trail;
