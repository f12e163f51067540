//! Axis-aligned collision between tokens and the player hitbox

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::percent_to_pixels;
use crate::settings::GameConfig;

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_top_left(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Player catch area: centred on `position` (0-100), anchored near the bottom
pub fn player_hitbox(position: f32, config: &GameConfig) -> Aabb {
    let center_x = percent_to_pixels(position, config.playfield_width);
    let top = config.hitbox_top();
    Aabb {
        min: Vec2::new(center_x - config.hitbox_width / 2.0, top),
        max: Vec2::new(
            center_x + config.hitbox_width / 2.0,
            top + config.hitbox_height,
        ),
    }
}
