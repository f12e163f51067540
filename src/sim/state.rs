//! Session state and core simulation types
//!
//! Everything the tick mutates lives in one [`SessionState`] record.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::settings::GameConfig;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Tokens falling, clock running
    Playing,
    /// Clock ran out (or session abandoned); state is frozen
    GameOver,
}

/// Stable token identifier, used for removal and render keying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token-{}", self.0)
    }
}

/// A falling answer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub text: String,
    pub is_correct: bool,
    /// Top-left corner
    pub pos: Vec2,
    /// Fall speed (units per tick)
    pub velocity_y: f32,
    pub size: Vec2,
}

impl Token {
    /// Move down by one tick
    pub fn advance(&mut self) {
        self.pos.y += self.velocity_y;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.pos, self.size)
    }
}

/// Kind of catch feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    Correct,
    Incorrect,
}

/// Transient catch message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
    /// Simulation time the message disappears
    pub expires_at_ms: u64,
}

impl Feedback {
    pub fn correct(reward: u32, expires_at_ms: u64) -> Self {
        Self {
            kind: FeedbackKind::Correct,
            message: format!("+{reward} Great job!"),
            expires_at_ms,
        }
    }

    pub fn incorrect(penalty: u32, expires_at_ms: u64) -> Self {
        Self {
            kind: FeedbackKind::Incorrect,
            message: format!("-{penalty} Not quite!"),
            expires_at_ms,
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

/// Things that happened during a tick or clock second
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    TokenSpawned { id: TokenId, is_correct: bool },
    CorrectCatch { id: TokenId, score: u32 },
    IncorrectCatch { id: TokenId, score: u32 },
    QuestionAdvanced { index: usize },
    FeedbackCleared,
    SecondElapsed { remaining: u32 },
    GameOver { final_score: u32 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Seed for reproducible spawning
    pub seed: u64,
    pub score: u32,
    /// Whole seconds left on the clock
    pub time_remaining: u32,
    /// Active question, always `< bank.len()`
    pub question_index: usize,
    /// Falling tokens in spawn order
    pub tokens: Vec<Token>,
    pub feedback: Option<Feedback>,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation time of the last spawn (or session start)
    pub last_spawn_ms: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl SessionState {
    /// Fresh session starting at `start_ms`
    pub fn new(seed: u64, config: &GameConfig, start_ms: u64) -> Self {
        Self {
            seed,
            score: 0,
            time_remaining: config.session_seconds,
            question_index: 0,
            tokens: Vec::new(),
            feedback: None,
            phase: GamePhase::Playing,
            time_ticks: 0,
            last_spawn_ms: start_ms,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new token ID
    pub fn next_token_id(&mut self) -> TokenId {
        let id = TokenId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Freeze the session. Further ticks and clock seconds are ignored.
    pub fn terminate(&mut self) {
        self.phase = GamePhase::GameOver;
    }
}
