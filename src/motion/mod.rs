//! Camera motion sensing
//!
//! Turns a live video feed into a smoothed horizontal player position:
//! - `estimator`: frame differencing, motion centroid, exponential smoothing
//! - `capture`: capture device trait and a synthetic camera
//! - `tracker`: device + estimator lifecycle (activate, sample, release)

pub mod capture;
pub mod estimator;
pub mod tracker;

pub use capture::{CaptureDevice, SyntheticCamera};
pub use estimator::{MotionEstimator, MotionFrame, MotionParams, MotionSample};
pub use tracker::{MotionTracker, TrackerStatus};
