//! Capture devices
//!
//! A [`CaptureDevice`] is anything that can stream RGB frames after the
//! user grants access. [`SyntheticCamera`] renders a "performer" column on
//! a dark background so the pipeline can run without hardware.

use image::{Rgb, RgbImage};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::CaptureError;

/// A camera-like frame source
pub trait CaptureDevice {
    /// Request access and begin streaming
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Latest frame, or `Ok(None)` when not streaming
    fn grab_frame(&mut self) -> Result<Option<&RgbImage>, CaptureError>;

    /// Release all hardware resources. Must be safe to call repeatedly.
    fn stop(&mut self);

    fn is_streaming(&self) -> bool;
}

/// Background brightness of the synthetic scene
const BACKGROUND: u8 = 30;
/// Performer brightness on alternating frames (the "wave")
const PERFORMER_BRIGHT: u8 = 230;
const PERFORMER_DIM: u8 = 120;

/// Software camera with a waving performer at a controllable column
#[derive(Debug, Clone)]
pub struct SyntheticCamera {
    frame: RgbImage,
    /// Performer centre as a fraction of frame width (camera coordinates)
    performer_x: f32,
    /// Performer width as a fraction of frame width
    performer_width: f32,
    /// Max per-channel background noise
    noise: u8,
    deny_permission: bool,
    /// Frames delivered before the stream drops
    stream_limit: Option<u64>,
    frames_delivered: u64,
    streaming: bool,
    /// Times `start` succeeded
    starts: u32,
    rng: Pcg32,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: RgbImage::from_pixel(width, height, Rgb([BACKGROUND; 3])),
            performer_x: 0.5,
            performer_width: 0.1,
            noise: 0,
            deny_permission: false,
            stream_limit: None,
            frames_delivered: 0,
            streaming: false,
            starts: 0,
            rng: Pcg32::seed_from_u64(0x5eed),
        }
    }

    /// Add per-pixel background noise up to `amplitude`
    pub fn with_noise(mut self, amplitude: u8, seed: u64) -> Self {
        self.noise = amplitude;
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    /// Refuse the next `start` calls until cleared with [`Self::set_denied`]
    pub fn denying_permission(mut self) -> Self {
        self.deny_permission = true;
        self
    }

    /// Drop the stream after `frames` frames
    pub fn with_stream_limit(mut self, frames: u64) -> Self {
        self.stream_limit = Some(frames);
        self
    }

    pub fn set_denied(&mut self, denied: bool) {
        self.deny_permission = denied;
    }

    /// Move the performer (0.0 = left edge of the camera image)
    pub fn set_performer_x(&mut self, x: f32) {
        self.performer_x = x.clamp(0.0, 1.0);
    }

    pub fn performer_x(&self) -> f32 {
        self.performer_x
    }

    pub fn starts(&self) -> u32 {
        self.starts
    }

    fn render(&mut self) {
        let width = self.frame.width() as f32;
        let half = self.performer_width * width / 2.0;
        let centre = self.performer_x * width;
        let lo = (centre - half).max(0.0) as u32;
        let hi = (centre + half).min(width) as u32;
        let performer = if self.frames_delivered % 2 == 0 {
            PERFORMER_BRIGHT
        } else {
            PERFORMER_DIM
        };

        for (x, _, px) in self.frame.enumerate_pixels_mut() {
            let value = if x >= lo && x < hi {
                performer
            } else if self.noise > 0 {
                BACKGROUND.saturating_add(self.rng.random_range(0..=self.noise))
            } else {
                BACKGROUND
            };
            *px = Rgb([value; 3]);
        }
    }
}

impl CaptureDevice for SyntheticCamera {
    fn start(&mut self) -> Result<(), CaptureError> {
        if self.deny_permission {
            return Err(CaptureError::PermissionDenied);
        }
        self.streaming = true;
        self.frames_delivered = 0;
        self.starts += 1;
        Ok(())
    }

    fn grab_frame(&mut self) -> Result<Option<&RgbImage>, CaptureError> {
        if !self.streaming {
            return Ok(None);
        }
        if let Some(limit) = self.stream_limit {
            if self.frames_delivered >= limit {
                self.streaming = false;
                return Err(CaptureError::StreamEnded);
            }
        }
        self.render();
        self.frames_delivered += 1;
        Ok(Some(&self.frame))
    }

    fn stop(&mut self) {
        self.streaming = false;
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }
}
