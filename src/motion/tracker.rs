//! Capture lifecycle around the motion estimator

use super::capture::CaptureDevice;
use super::estimator::{MotionEstimator, MotionParams, MotionSample};
use crate::error::CaptureError;

/// Where the tracker is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerStatus {
    /// Not started, or released
    Inactive,
    /// Camera granted and streaming
    Streaming,
    /// Camera denied or failed; position is frozen
    Unavailable(CaptureError),
}

/// Owns a capture device and turns its frames into a player position
pub struct MotionTracker<D: CaptureDevice> {
    device: D,
    estimator: MotionEstimator,
    status: TrackerStatus,
}

impl<D: CaptureDevice> MotionTracker<D> {
    pub fn new(device: D, params: MotionParams) -> Self {
        Self {
            device,
            estimator: MotionEstimator::new(params),
            status: TrackerStatus::Inactive,
        }
    }

    /// Start capture. On failure the device is released and the error kept.
    pub fn activate(&mut self) -> Result<(), CaptureError> {
        if self.status == TrackerStatus::Streaming {
            return Ok(());
        }
        match self.device.start() {
            Ok(()) => {
                self.estimator.reset();
                self.status = TrackerStatus::Streaming;
                log::info!("Camera streaming");
                Ok(())
            }
            Err(err) => {
                log::warn!("Camera unavailable: {err}");
                self.device.stop();
                self.status = TrackerStatus::Unavailable(err.clone());
                Err(err)
            }
        }
    }

    /// Stop capture and drop the previous frame
    pub fn deactivate(&mut self) {
        if self.device.is_streaming() {
            log::info!("Camera released");
        }
        self.device.stop();
        self.estimator.reset();
        if self.status == TrackerStatus::Streaming {
            self.status = TrackerStatus::Inactive;
        }
    }

    /// Process the current camera frame, if streaming
    pub fn sample(&mut self) -> Result<Option<MotionSample>, CaptureError> {
        if self.status != TrackerStatus::Streaming {
            return Ok(None);
        }
        match self.device.grab_frame() {
            Ok(Some(frame)) => Ok(Some(self.estimator.process_image(frame))),
            Ok(None) => Ok(None),
            Err(err) => {
                log::warn!("Camera stream lost: {err}");
                self.device.stop();
                self.estimator.reset();
                self.status = TrackerStatus::Unavailable(err.clone());
                Err(err)
            }
        }
    }

    /// Smoothed player position (0-100)
    pub fn position(&self) -> f32 {
        self.estimator.position()
    }

    pub fn status(&self) -> &TrackerStatus {
        &self.status
    }

    pub fn is_streaming(&self) -> bool {
        self.status == TrackerStatus::Streaming
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

impl<D: CaptureDevice> Drop for MotionTracker<D> {
    fn drop(&mut self) {
        self.device.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::SyntheticCamera;

    fn params() -> MotionParams {
        MotionParams {
            mirror: false,
            ..MotionParams::default()
        }
    }

    #[test]
    fn test_denied_tracker_never_moves() {
        let cam = SyntheticCamera::new(64, 48).denying_permission();
        let mut tracker = MotionTracker::new(cam, params());
        assert_eq!(tracker.activate(), Err(CaptureError::PermissionDenied));
        assert_eq!(
            tracker.status(),
            &TrackerStatus::Unavailable(CaptureError::PermissionDenied)
        );
        for _ in 0..10 {
            assert_eq!(tracker.sample(), Ok(None));
        }
        assert_eq!(tracker.position(), 50.0);
        assert!(!tracker.device().is_streaming());
    }

    #[test]
    fn test_tracks_performer() {
        let mut cam = SyntheticCamera::new(64, 48);
        cam.set_performer_x(0.2);
        let mut tracker = MotionTracker::new(cam, params());
        tracker.activate().unwrap();
        for _ in 0..40 {
            tracker.sample().unwrap();
        }
        assert!((tracker.position() - 20.0).abs() < 2.0, "{}", tracker.position());
    }

    #[test]
    fn test_deactivate_releases_camera() {
        let mut tracker = MotionTracker::new(SyntheticCamera::new(64, 48), params());
        tracker.activate().unwrap();
        assert!(tracker.device().is_streaming());
        tracker.deactivate();
        assert!(!tracker.device().is_streaming());
        assert_eq!(tracker.status(), &TrackerStatus::Inactive);
        assert_eq!(tracker.sample(), Ok(None));
    }

    #[test]
    fn test_lost_stream_marks_unavailable() {
        let cam = SyntheticCamera::new(64, 48).with_stream_limit(3);
        let mut tracker = MotionTracker::new(cam, params());
        tracker.activate().unwrap();
        for _ in 0..3 {
            assert!(tracker.sample().unwrap().is_some());
        }
        assert_eq!(tracker.sample(), Err(CaptureError::StreamEnded));
        assert!(!tracker.is_streaming());
        assert!(!tracker.device().is_streaming());
    }

    #[test]
    fn test_reactivate_after_grant() {
        let cam = SyntheticCamera::new(64, 48).denying_permission();
        let mut tracker = MotionTracker::new(cam, params());
        assert!(tracker.activate().is_err());
        tracker.device_mut().set_denied(false);
        tracker.activate().unwrap();
        assert!(tracker.is_streaming());
        assert_eq!(tracker.device().starts(), 1);
    }
}
