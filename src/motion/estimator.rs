//! Frame-difference motion estimation
//!
//! Each processed frame is compared to the one before it. Pixels whose
//! averaged RGB change exceeds a threshold are "moving"; the mean column of
//! the moving pixels is the motion centroid, which pulls the player position
//! through a one-pole low-pass filter.

use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::consts::START_POSITION;
use crate::settings::GameConfig;

/// A downsampled RGB frame
#[derive(Debug, Clone, PartialEq)]
pub struct MotionFrame {
    image: RgbImage,
}

impl MotionFrame {
    /// Downsample a camera frame with a single nearest-neighbour resize
    pub fn downsample(source: &RgbImage, width: u32, height: u32) -> Self {
        let image = if source.dimensions() == (width, height) {
            source.clone()
        } else {
            imageops::resize(source, width, height, FilterType::Nearest)
        };
        Self { image }
    }

    /// Wrap an image that is already at processing resolution
    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// Estimator tunables, extracted from [`GameConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub width: u32,
    pub height: u32,
    pub threshold: u8,
    pub min_pixels: usize,
    pub smoothing: f32,
    pub mirror: bool,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

impl From<&GameConfig> for MotionParams {
    fn from(config: &GameConfig) -> Self {
        Self {
            width: config.downsample_width,
            height: config.downsample_height,
            threshold: config.motion_threshold,
            min_pixels: config.min_motion_pixels,
            smoothing: config.smoothing,
            mirror: config.mirror,
        }
    }
}

/// What one processed frame saw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Pixels whose change exceeded the threshold
    pub moving_pixels: usize,
    /// Motion centroid in 0-100, if the frame cleared the noise floor
    pub centroid: Option<f32>,
    /// Player position after this frame
    pub position: f32,
}

/// Smoothed horizontal position from successive frames
#[derive(Debug, Clone)]
pub struct MotionEstimator {
    params: MotionParams,
    position: f32,
    previous: Option<MotionFrame>,
}

impl MotionEstimator {
    pub fn new(params: MotionParams) -> Self {
        Self {
            params,
            position: START_POSITION,
            previous: None,
        }
    }

    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    /// Current player position (0-100)
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Whether a previous frame is held for differencing
    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }

    /// Forget the previous frame; the next frame only primes. Position is kept.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Downsample a raw camera frame and process it
    pub fn process_image(&mut self, source: &RgbImage) -> MotionSample {
        let frame = MotionFrame::downsample(source, self.params.width, self.params.height);
        self.process(frame)
    }

    /// Compare `frame` to the previous one, update the position, keep `frame`
    pub fn process(&mut self, frame: MotionFrame) -> MotionSample {
        let frame_width = frame.width().max(1) as f32;
        let (moving_pixels, sum_x) = match &self.previous {
            Some(prev) if prev.image.dimensions() == frame.image.dimensions() => {
                self.accumulate(prev, &frame)
            }
            _ => (0, 0),
        };
        self.previous = Some(frame);

        let centroid = if moving_pixels >= self.params.min_pixels.max(1) {
            let avg_x = sum_x as f32 / moving_pixels as f32;
            Some(avg_x / frame_width * 100.0)
        } else {
            None
        };

        if let Some(target) = centroid {
            let next = self.position + (target - self.position) * self.params.smoothing;
            self.position = next.clamp(0.0, 100.0);
        }

        MotionSample {
            moving_pixels,
            centroid,
            position: self.position,
        }
    }

    /// Count moving pixels and sum their (optionally mirrored) columns
    fn accumulate(&self, prev: &MotionFrame, frame: &MotionFrame) -> (usize, u64) {
        let width = frame.width() as u64;
        // avg > t  <=>  sum > 3t, keeps the loop in integers
        let limit = self.params.threshold as u16 * 3;

        let mut count = 0usize;
        let mut sum_x = 0u64;

        for (i, (cur, old)) in frame
            .pixels()
            .chunks_exact(3)
            .zip(prev.pixels().chunks_exact(3))
            .enumerate()
        {
            let diff = cur[0].abs_diff(old[0]) as u16
                + cur[1].abs_diff(old[1]) as u16
                + cur[2].abs_diff(old[2]) as u16;

            if diff > limit {
                let x = i as u64 % width;
                sum_x += if self.params.mirror { width - x } else { x };
                count += 1;
            }
        }

        (count, sum_x)
    }
}
