//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of capture and
//! rendering concerns:
//! - Per-frame tick driven by the caller's clock
//! - Seeded RNG only
//! - Stable iteration order (tokens in spawn order)
//! - One owned state record mutated only by `tick` and the session clock

pub mod clock;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::SessionClock;
pub use collision::{Aabb, player_hitbox};
pub use spawn::{maybe_spawn, spawn_due, spawn_token};
pub use state::{
    Feedback, FeedbackKind, GameEvent, GamePhase, SessionState, Token, TokenId,
};
pub use tick::{TickInput, tick};
