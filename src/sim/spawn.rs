//! Token spawning
//!
//! One token per spawn interval, carrying either the active question's
//! correct answer or one of its distractors.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{SessionState, Token, TokenId};
use crate::quiz::QuestionBank;
use crate::settings::GameConfig;

/// Whether the spawn interval has elapsed at `now_ms`
pub fn spawn_due(state: &SessionState, config: &GameConfig, now_ms: u64) -> bool {
    now_ms.saturating_sub(state.last_spawn_ms) >= config.spawn_interval_ms
}

/// Spawn a token if the interval has elapsed
pub fn maybe_spawn(
    state: &mut SessionState,
    bank: &QuestionBank,
    config: &GameConfig,
    now_ms: u64,
) -> Option<TokenId> {
    if !spawn_due(state, config, now_ms) {
        return None;
    }
    state.last_spawn_ms = now_ms;
    Some(spawn_token(state, bank, config))
}

/// Create one token for the active question and append it to the session
pub fn spawn_token(
    state: &mut SessionState,
    bank: &QuestionBank,
    config: &GameConfig,
) -> TokenId {
    let question = bank.get(state.question_index);
    let wants_correct = state.rng.random_bool(config.correct_spawn_probability);
    let wrong: Vec<&str> = question.incorrect_answers().collect();
    let (text, is_correct) = match wrong.choose(&mut state.rng) {
        Some(&answer) if !wants_correct => (answer, false),
        _ => (question.correct_answer(), true),
    };

    let x = state
        .rng
        .random_range(config.spawn_margin..=config.spawn_x_max());
    let velocity_y = if config.min_fall_speed < config.max_fall_speed {
        state
            .rng
            .random_range(config.min_fall_speed..config.max_fall_speed)
    } else {
        config.min_fall_speed
    };

    let token = Token {
        id: TokenId(0),
        text: text.to_string(),
        is_correct,
        pos: Vec2::new(x, config.spawn_y),
        velocity_y,
        size: Vec2::new(config.token_width, config.token_height),
    };

    let id = state.next_token_id();
    log::debug!("Spawned {id} '{}' (correct: {is_correct})", token.text);
    state.tokens.push(Token { id, ..token });
    id
}
