//! Per-frame simulation tick
//!
//! Runs once per animation frame (not a fixed timestep): token speeds are
//! per-tick and tuned for typical refresh rates.

use super::collision::player_hitbox;
use super::spawn::maybe_spawn;
use super::state::{Feedback, GameEvent, SessionState, Token};
use crate::quiz::QuestionBank;
use crate::settings::GameConfig;

/// Inputs for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Simulation time of this frame
    pub now_ms: u64,
    /// Player position (0-100) from the motion tracker
    pub player_position: f32,
}

/// Advance the session by one frame.
///
/// Tokens are moved and tested in stored order. At most one catch is scored
/// per tick: the first overlapping token is removed and scored, later
/// overlapping tokens stay in play and are only dropped if they have left
/// the playfield. No spawn happens on a tick with a catch.
pub fn tick(
    state: &mut SessionState,
    bank: &QuestionBank,
    config: &GameConfig,
    input: &TickInput,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.is_terminated() {
        return events;
    }

    state.time_ticks += 1;

    if state
        .feedback
        .as_ref()
        .is_some_and(|fb| fb.is_expired(input.now_ms))
    {
        state.feedback = None;
        events.push(GameEvent::FeedbackCleared);
    }

    let hitbox = player_hitbox(input.player_position, config);
    let floor = config.playfield_height;
    let mut caught: Option<Token> = None;

    state.tokens.retain_mut(|token| {
        token.advance();
        if caught.is_none() && token.bounds().overlaps(&hitbox) {
            caught = Some(token.clone());
            return false;
        }
        token.pos.y < floor
    });

    match caught {
        Some(token) => apply_catch(state, bank, config, &token, input.now_ms, &mut events),
        None => {
            if let Some(id) = maybe_spawn(state, bank, config, input.now_ms) {
                let is_correct = state.tokens.last().is_some_and(|t| t.is_correct);
                events.push(GameEvent::TokenSpawned { id, is_correct });
            }
        }
    }

    events
}

/// Score a caught token
fn apply_catch(
    state: &mut SessionState,
    bank: &QuestionBank,
    config: &GameConfig,
    token: &Token,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) {
    let expires_at_ms = now_ms + config.feedback_duration_ms;

    if token.is_correct {
        state.score += config.correct_reward;
        state.feedback = Some(Feedback::correct(config.correct_reward, expires_at_ms));
        state.question_index = bank.next_index(state.question_index);
        log::debug!(
            "Caught correct {} -> score {}, question {}",
            token.id,
            state.score,
            state.question_index
        );
        events.push(GameEvent::CorrectCatch {
            id: token.id,
            score: state.score,
        });
        events.push(GameEvent::QuestionAdvanced {
            index: state.question_index,
        });
    } else {
        state.score = state.score.saturating_sub(config.incorrect_penalty);
        state.feedback = Some(Feedback::incorrect(config.incorrect_penalty, expires_at_ms));
        log::debug!("Caught wrong {} -> score {}", token.id, state.score);
        events.push(GameEvent::IncorrectCatch {
            id: token.id,
            score: state.score,
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sim::state::{FeedbackKind, TokenId};
    use glam::Vec2;
    use proptest::prelude::*;

    /// Put a token right above the player so the next tick catches it
    pub(crate) fn drop_on_player(
        state: &mut SessionState,
        config: &GameConfig,
        position: f32,
        is_correct: bool,
    ) -> TokenId {
        let id = state.next_token_id();
        let center_x = crate::percent_to_pixels(position, config.playfield_width);
        state.tokens.push(Token {
            id,
            text: if is_correct { "right" } else { "wrong" }.to_string(),
            is_correct,
            pos: Vec2::new(
                center_x - config.token_width / 2.0,
                config.hitbox_top() - 10.0,
            ),
            velocity_y: 4.0,
            size: Vec2::new(config.token_width, config.token_height),
        });
        id
    }

    fn setup() -> (SessionState, QuestionBank, GameConfig) {
        let config = GameConfig::default();
        (SessionState::new(9, &config, 0), QuestionBank::fallback(), config)
    }

    fn input(now_ms: u64) -> TickInput {
        TickInput {
            now_ms,
            player_position: 50.0,
        }
    }

    #[test]
    fn test_tokens_fall() {
        let (mut state, bank, config) = setup();
        let id = state.next_token_id();
        state.tokens.push(Token {
            id,
            text: "x".to_string(),
            is_correct: true,
            pos: Vec2::new(30.0, 0.0),
            velocity_y: 4.0,
            size: Vec2::new(120.0, 60.0),
        });
        tick(&mut state, &bank, &config, &input(0));
        tick(&mut state, &bank, &config, &input(16));
        assert_eq!(state.tokens[0].pos.y, 8.0);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_correct_catch_scores_and_advances() {
        let (mut state, bank, config) = setup();
        let id = drop_on_player(&mut state, &config, 50.0, true);
        let events = tick(&mut state, &bank, &config, &input(100));
        assert_eq!(state.score, 10);
        assert_eq!(state.question_index, 1);
        assert!(state.tokens.is_empty());
        assert_eq!(
            events,
            vec![
                GameEvent::CorrectCatch { id, score: 10 },
                GameEvent::QuestionAdvanced { index: 1 },
            ]
        );
        let fb = state.feedback.as_ref().unwrap();
        assert_eq!(fb.kind, FeedbackKind::Correct);
        assert_eq!(fb.expires_at_ms, 1100);
    }

    #[test]
    fn test_incorrect_catch_floors_at_zero() {
        let (mut state, bank, config) = setup();
        for i in 0..3 {
            drop_on_player(&mut state, &config, 50.0, false);
            tick(&mut state, &bank, &config, &input(i));
            assert_eq!(state.score, 0);
            assert_eq!(state.question_index, 0);
        }
        assert_eq!(state.feedback.unwrap().kind, FeedbackKind::Incorrect);
    }

    #[test]
    fn test_incorrect_catch_subtracts_penalty() {
        let (mut state, bank, config) = setup();
        state.score = 12;
        drop_on_player(&mut state, &config, 50.0, false);
        tick(&mut state, &bank, &config, &input(0));
        assert_eq!(state.score, 7);
    }

    #[test]
    fn test_single_hit_per_tick() {
        let (mut state, bank, config) = setup();
        let first = drop_on_player(&mut state, &config, 50.0, true);
        let second = drop_on_player(&mut state, &config, 50.0, true);
        let third = drop_on_player(&mut state, &config, 50.0, true);

        tick(&mut state, &bank, &config, &input(0));
        assert_eq!(state.score, 10);
        assert_eq!(state.question_index, 1);
        let left: Vec<_> = state.tokens.iter().map(|t| t.id).collect();
        assert_eq!(left, vec![second, third]);
        assert!(!left.contains(&first));

        // Still overlapping next frame: exactly one more catch
        tick(&mut state, &bank, &config, &input(16));
        assert_eq!(state.score, 20);
        assert_eq!(state.tokens.len(), 1);
    }

    #[test]
    fn test_missed_tokens_drop_silently() {
        let (mut state, bank, config) = setup();
        let id = state.next_token_id();
        state.tokens.push(Token {
            id,
            text: "x".to_string(),
            is_correct: true,
            pos: Vec2::new(30.0, config.playfield_height - 2.0),
            velocity_y: 4.0,
            size: Vec2::new(120.0, 60.0),
        });
        let events = tick(&mut state, &bank, &config, &input(0));
        assert!(state.tokens.is_empty());
        assert_eq!(state.score, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_no_spawn_on_catch_tick() {
        let (mut state, bank, config) = setup();
        drop_on_player(&mut state, &config, 50.0, false);
        let events = tick(&mut state, &bank, &config, &input(5000));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::TokenSpawned { .. }))
        );
        let events = tick(&mut state, &bank, &config, &input(5016));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::TokenSpawned { .. }))
        );
    }

    #[test]
    fn test_feedback_clears_after_duration() {
        let (mut state, bank, config) = setup();
        drop_on_player(&mut state, &config, 50.0, true);
        tick(&mut state, &bank, &config, &input(0));
        tick(&mut state, &bank, &config, &input(999));
        assert!(state.feedback.is_some());
        let events = tick(&mut state, &bank, &config, &input(1000));
        assert!(state.feedback.is_none());
        assert!(events.contains(&GameEvent::FeedbackCleared));
    }

    #[test]
    fn test_five_correct_catches_cycle_questions() {
        let (mut state, bank, config) = setup();
        assert_eq!(bank.len(), 3);
        for i in 0..5 {
            drop_on_player(&mut state, &config, 50.0, true);
            tick(&mut state, &bank, &config, &input(i * 16));
        }
        assert_eq!(state.score, 50);
        assert_eq!(state.question_index, 5 % 3);
    }

    #[test]
    fn test_terminated_session_is_frozen() {
        let (mut state, bank, config) = setup();
        drop_on_player(&mut state, &config, 50.0, true);
        state.terminate();
        let events = tick(&mut state, &bank, &config, &input(10_000));
        assert!(events.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.tokens.len(), 1);
    }

    #[test]
    fn test_player_elsewhere_misses() {
        let (mut state, bank, config) = setup();
        drop_on_player(&mut state, &config, 10.0, true);
        let events = tick(
            &mut state,
            &bank,
            &config,
            &TickInput {
                now_ms: 0,
                player_position: 90.0,
            },
        );
        assert!(events.is_empty());
        assert_eq!(state.tokens.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_score_and_index_stay_valid(catches in prop::collection::vec(any::<bool>(), 0..80)) {
            let (mut state, bank, config) = setup();
            let mut expected: i64 = 0;
            for (i, correct) in catches.iter().enumerate() {
                drop_on_player(&mut state, &config, 50.0, *correct);
                tick(&mut state, &bank, &config, &input(i as u64));
                expected = if *correct { expected + 10 } else { (expected - 5).max(0) };
                prop_assert_eq!(state.score as i64, expected);
                prop_assert!(state.question_index < bank.len());
            }
        }
    }
}
