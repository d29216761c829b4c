//! Webcam fingertip trail.
//!
//! A detection loop turns object-detector output into an approximate
//! fingertip position and keeps a bounded trail of them; a render loop
//! draws that trail as a polyline once per frame. Camera, model and canvas
//! sit behind the ports in [`application::ports`].

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
