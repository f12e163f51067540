//! Application flow: menu, loading questions, playing, game over
//!
//! The app owns at most one [`GameSession`]. Starting a new game or going
//! back to the menu drops the previous session, which cancels its timers
//! and releases the camera.

use crate::error::{AppError, CaptureError};
use crate::motion::CaptureDevice;
use crate::quiz::{QuestionBank, QuestionProvider};
use crate::session::{GameSession, Presenter};
use crate::settings::GameConfig;
use crate::sim::GameEvent;

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    Menu,
    /// Waiting for the question bank
    Loading,
    Playing,
    GameOver { final_score: u32 },
}

pub struct App<D: CaptureDevice, P: Presenter> {
    config: GameConfig,
    phase: AppPhase,
    session: Option<GameSession<D, P>>,
    base_seed: u64,
    games_started: u64,
}

impl<D: CaptureDevice, P: Presenter> App<D, P> {
    pub fn new(config: GameConfig, base_seed: u64) -> Self {
        Self {
            config,
            phase: AppPhase::Menu,
            session: None,
            base_seed,
            games_started: 0,
        }
    }

    pub fn phase(&self) -> AppPhase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn games_started(&self) -> u64 {
        self.games_started
    }

    /// Player pressed start. Returns false if a game is already underway.
    pub fn request_start(&mut self) -> bool {
        match self.phase {
            AppPhase::Menu | AppPhase::GameOver { .. } => {
                self.session = None;
                self.phase = AppPhase::Loading;
                true
            }
            AppPhase::Loading | AppPhase::Playing => false,
        }
    }

    /// Questions are ready; start the session
    pub fn begin_session(
        &mut self,
        bank: QuestionBank,
        device: D,
        presenter: P,
        now_ms: u64,
    ) -> Result<(), AppError> {
        if self.phase != AppPhase::Loading {
            return Err(AppError::WrongPhase { phase: self.phase });
        }

        let seed = self.next_seed();
        match GameSession::start(self.config.clone(), bank, device, presenter, seed, now_ms) {
            Ok(session) => {
                self.games_started += 1;
                self.session = Some(session);
                self.phase = AppPhase::Playing;
                Ok(())
            }
            Err(err) => {
                log::error!("Could not start session: {err}");
                self.phase = AppPhase::Menu;
                Err(err.into())
            }
        }
    }

    /// Menu -> loading -> playing in one go
    pub fn start_game(
        &mut self,
        provider: &mut dyn QuestionProvider,
        device: D,
        presenter: P,
        now_ms: u64,
    ) -> Result<(), AppError> {
        if !self.request_start() {
            return Ok(());
        }
        let bank = QuestionBank::load(provider);
        self.begin_session(bank, device, presenter, now_ms)
    }

    /// Drive the current session
    pub fn pump(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let events = session.pump(now_ms);

        let final_score = events.iter().find_map(|e| match e {
            GameEvent::GameOver { final_score } => Some(*final_score),
            _ => None,
        });
        if let Some(final_score) = final_score {
            log::info!("Game over with {final_score} points");
            self.phase = AppPhase::GameOver { final_score };
        }

        events
    }

    /// Abandon whatever is running and show the menu
    pub fn return_to_menu(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
        self.phase = AppPhase::Menu;
    }

    pub fn retry_camera(&mut self, now_ms: u64) -> Result<(), CaptureError> {
        match self.session.as_mut() {
            Some(session) => session.retry_camera(now_ms),
            None => Ok(()),
        }
    }

    pub fn session(&self) -> Option<&GameSession<D, P>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession<D, P>> {
        self.session.as_mut()
    }

    /// Each game gets its own spawn sequence
    fn next_seed(&self) -> u64 {
        self.base_seed ^ self.games_started.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}
