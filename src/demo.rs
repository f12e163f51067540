//! Demo autopilot
//!
//! Plays the game without a person in front of the camera: picks the lowest
//! correct token still in reach and walks a synthetic performer toward it.

use crate::percent_to_pixels;
use crate::settings::GameConfig;
use crate::sim::SessionState;

/// Percent of playfield width the performer can cover per frame
pub const DEFAULT_MAX_STEP: f32 = 1.5;

/// Steers the player toward correct tokens
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Where the performer currently stands (0-100, screen space)
    position: f32,
    max_step: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(crate::consts::START_POSITION, DEFAULT_MAX_STEP)
    }
}

impl Autopilot {
    pub fn new(position: f32, max_step: f32) -> Self {
        Self {
            position: position.clamp(0.0, 100.0),
            max_step: max_step.max(0.0),
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Screen position (0-100) of the token worth catching, if any.
    ///
    /// Prefers the correct token closest to the ground that has not yet
    /// fallen past the hitbox.
    pub fn target(state: &SessionState, config: &GameConfig) -> Option<f32> {
        let hitbox_bottom = config.hitbox_top() + config.hitbox_height;

        state
            .tokens
            .iter()
            .filter(|t| t.is_correct && t.pos.y < hitbox_bottom)
            .max_by(|a, b| {
                a.pos
                    .y
                    .partial_cmp(&b.pos.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|t| {
                let centre = t.pos.x + t.size.x / 2.0;
                (centre / config.playfield_width * 100.0).clamp(0.0, 100.0)
            })
    }

    /// Advance one frame and return the new performer position (0-100).
    ///
    /// With nothing to chase the performer drifts back toward the middle.
    pub fn step(&mut self, state: &SessionState, config: &GameConfig) -> f32 {
        let target = Self::target(state, config).unwrap_or(crate::consts::START_POSITION);
        let delta = (target - self.position).clamp(-self.max_step, self.max_step);
        self.position = (self.position + delta).clamp(0.0, 100.0);
        self.position
    }

    /// Playfield x of the performer
    pub fn pixel_x(&self, config: &GameConfig) -> f32 {
        percent_to_pixels(self.position, config.playfield_width)
    }
}

/// Camera-space performer column (0.0-1.0) that shows up at `percent` on
/// screen
pub fn performer_x_for(percent: f32, mirror: bool) -> f32 {
    let fraction = (percent / 100.0).clamp(0.0, 1.0);
    if mirror { 1.0 - fraction } else { fraction }
}
