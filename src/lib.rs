//! Motion Catch - a camera-steered quiz catching game
//!
//! Core modules:
//! - `motion`: Camera capture and frame-difference motion estimation
//! - `sim`: Per-frame simulation (spawning, physics, collisions, countdown)
//! - `quiz`: Questions, providers and the built-in fallback bank
//! - `platform`: Cooperative scheduler and time sources
//! - `session`: Lifecycle owner tying capture, simulation and timers together
//! - `app`: Menu / loading / playing / game-over flow
//! - `settings`: Data-driven game tuning
//! - `demo`: Autopilot for headless play

pub mod app;
pub mod demo;
pub mod error;
pub mod motion;
pub mod platform;
pub mod quiz;
pub mod session;
pub mod settings;
pub mod sim;

pub use app::{App, AppPhase};
pub use error::{AppError, CaptureError, ConfigError, ProviderError, QuestionError};
pub use session::{GameSession, NullPresenter, Presenter, RenderFrame, SessionPhase};
pub use settings::{Difficulty, GameConfig};

/// Default tuning constants
pub mod consts {
    /// Motion processing resolution
    pub const DOWNSAMPLE_WIDTH: u32 = 64;
    pub const DOWNSAMPLE_HEIGHT: u32 = 48;
    /// Per-pixel averaged RGB difference (0-255) that counts as motion
    pub const MOTION_THRESHOLD: u8 = 20;
    /// Frames with fewer moving pixels than this are treated as noise
    pub const MIN_MOTION_PIXELS: usize = 6;
    /// Exponential smoothing factor for the player position
    pub const SMOOTHING_FACTOR: f32 = 0.15;
    /// Player starts in the middle of the playfield
    pub const START_POSITION: f32 = 50.0;

    /// Playfield (logical pixels)
    pub const PLAYFIELD_WIDTH: f32 = 1280.0;
    pub const PLAYFIELD_HEIGHT: f32 = 720.0;

    /// Player hitbox, anchored near the bottom of the playfield
    pub const HITBOX_WIDTH: f32 = 120.0;
    pub const HITBOX_HEIGHT: f32 = 80.0;
    pub const HITBOX_BOTTOM_OFFSET: f32 = 100.0;

    /// Token defaults
    pub const TOKEN_WIDTH: f32 = 120.0;
    pub const TOKEN_HEIGHT: f32 = 60.0;
    pub const SPAWN_MARGIN: f32 = 25.0;
    pub const SPAWN_Y: f32 = -100.0;
    pub const MIN_FALL_SPEED: f32 = 3.0;
    pub const MAX_FALL_SPEED: f32 = 5.0;
    pub const SPAWN_INTERVAL_MS: u64 = 1500;
    pub const CORRECT_SPAWN_PROBABILITY: f64 = 0.6;

    /// Scoring
    pub const CORRECT_REWARD: u32 = 10;
    pub const INCORRECT_PENALTY: u32 = 5;
    pub const FEEDBACK_DURATION_MS: u64 = 1000;

    /// Session length
    pub const SESSION_SECONDS: u32 = 60;
    /// Countdown granularity
    pub const CLOCK_PERIOD_MS: u64 = 1000;
}

/// Map a 0-100 position onto a playfield axis of the given length
#[inline]
pub fn percent_to_pixels(percent: f32, length: f32) -> f32 {
    percent / 100.0 * length
}
