//! Game tuning and presets
//!
//! Every constant that shapes motion sensing, spawning, scoring and session
//! length lives in [`GameConfig`], so tests can build deterministic fixtures
//! and the demo can load overrides from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" | "med" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Milliseconds between spawns
    pub fn spawn_interval_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 1800,
            Difficulty::Normal => SPAWN_INTERVAL_MS,
            Difficulty::Hard => 1100,
        }
    }

    /// Fall speed band (units per tick)
    pub fn fall_speed(&self) -> (f32, f32) {
        match self {
            Difficulty::Easy => (2.0, 3.5),
            Difficulty::Normal => (MIN_FALL_SPEED, MAX_FALL_SPEED),
            Difficulty::Hard => (4.5, 7.0),
        }
    }
}

/// All gameplay tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,

    // === Motion sensing ===
    /// Width of the downsampled motion frame
    pub downsample_width: u32,
    /// Height of the downsampled motion frame
    pub downsample_height: u32,
    /// Averaged RGB change (0-255) a pixel must exceed to count as motion.
    /// Higher ignores more sensor noise but needs bigger movements.
    pub motion_threshold: u8,
    /// Moving pixels required before a frame moves the player
    pub min_motion_pixels: usize,
    /// Smoothing factor in (0, 1]. 1.0 snaps to the motion centroid,
    /// small values lag but suppress jitter.
    pub smoothing: f32,
    /// Reflect columns so moving right on camera moves right on screen
    pub mirror: bool,

    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub hitbox_width: f32,
    pub hitbox_height: f32,
    /// Distance from the playfield bottom to the hitbox top edge
    pub hitbox_bottom_offset: f32,

    // === Spawning ===
    pub spawn_interval_ms: u64,
    /// Chance a spawned token carries the correct answer
    pub correct_spawn_probability: f64,
    pub token_width: f32,
    pub token_height: f32,
    /// Horizontal padding kept clear on both sides when spawning
    pub spawn_margin: f32,
    /// Vertical start position (negative is above the visible area)
    pub spawn_y: f32,
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,

    // === Scoring ===
    pub correct_reward: u32,
    pub incorrect_penalty: u32,
    /// How long catch feedback stays visible
    pub feedback_duration_ms: u64,

    // === Session ===
    pub session_seconds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            downsample_width: DOWNSAMPLE_WIDTH,
            downsample_height: DOWNSAMPLE_HEIGHT,
            motion_threshold: MOTION_THRESHOLD,
            min_motion_pixels: MIN_MOTION_PIXELS,
            smoothing: SMOOTHING_FACTOR,
            mirror: true,

            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            hitbox_width: HITBOX_WIDTH,
            hitbox_height: HITBOX_HEIGHT,
            hitbox_bottom_offset: HITBOX_BOTTOM_OFFSET,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            correct_spawn_probability: CORRECT_SPAWN_PROBABILITY,
            token_width: TOKEN_WIDTH,
            token_height: TOKEN_HEIGHT,
            spawn_margin: SPAWN_MARGIN,
            spawn_y: SPAWN_Y,
            min_fall_speed: MIN_FALL_SPEED,
            max_fall_speed: MAX_FALL_SPEED,

            correct_reward: CORRECT_REWARD,
            incorrect_penalty: INCORRECT_PENALTY,
            feedback_duration_ms: FEEDBACK_DURATION_MS,

            session_seconds: SESSION_SECONDS,
        }
    }
}

impl GameConfig {
    /// Create a config from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut config = Self::default();
        config.apply_preset(preset);
        config
    }

    /// Apply a difficulty preset (updates spawn cadence and fall speed)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.spawn_interval_ms = preset.spawn_interval_ms();
        let (min, max) = preset.fall_speed();
        self.min_fall_speed = min;
        self.max_fall_speed = max;
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.downsample_width == 0 || self.downsample_height == 0 {
            return invalid("downsample size must be non-zero");
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return invalid("smoothing must be in (0, 1]");
        }
        if !(0.0..=1.0).contains(&self.correct_spawn_probability) {
            return invalid("correct_spawn_probability must be in [0, 1]");
        }
        if self.min_fall_speed <= 0.0 || self.min_fall_speed > self.max_fall_speed {
            return invalid("fall speed band must be positive and ordered");
        }
        if self.spawn_x_max() < self.spawn_margin {
            return invalid("playfield too narrow for tokens and margins");
        }
        if self.hitbox_width <= 0.0 || self.hitbox_height <= 0.0 {
            return invalid("hitbox must have positive size");
        }
        if self.session_seconds == 0 {
            return invalid("session_seconds must be non-zero");
        }
        if self.spawn_interval_ms == 0 {
            return invalid("spawn_interval_ms must be non-zero");
        }
        Ok(())
    }

    /// Right-most spawn x (token's left edge)
    pub fn spawn_x_max(&self) -> f32 {
        self.playfield_width - self.token_width - self.spawn_margin
    }

    /// Top edge of the player hitbox
    pub fn hitbox_top(&self) -> f32 {
        self.playfield_height - self.hitbox_bottom_offset
    }
}
