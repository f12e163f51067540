//! One-second session countdown

use super::state::{GameEvent, SessionState};

/// Countdown that ends the session when it reaches zero
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    stopped: bool,
}

impl SessionClock {
    pub fn new() -> Self {
        Self { stopped: false }
    }

    /// Advance by one second.
    ///
    /// Returns `GameOver` exactly once, on the second that empties the clock;
    /// the session is terminated at that point with its score frozen.
    pub fn on_second(&mut self, state: &mut SessionState) -> Option<GameEvent> {
        if self.stopped || state.is_terminated() {
            return None;
        }

        if state.time_remaining <= 1 {
            state.time_remaining = 0;
            state.terminate();
            self.stopped = true;
            log::info!("Time up, final score {}", state.score);
            return Some(GameEvent::GameOver {
                final_score: state.score,
            });
        }

        state.time_remaining -= 1;
        Some(GameEvent::SecondElapsed {
            remaining: state.time_remaining,
        })
    }

    /// Stop without ending the session (abandoned game)
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
