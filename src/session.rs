//! Game session lifecycle
//!
//! A [`GameSession`] owns everything one game needs: the motion tracker and
//! its camera, the simulation state, the countdown and the two scheduled
//! tasks driving them (an animation frame re-requested every frame and a
//! one-second interval). The host only calls [`GameSession::pump`] with the
//! current time. Stopping, finishing or dropping a session cancels both
//! tasks and releases the camera.

use crate::consts::CLOCK_PERIOD_MS;
use crate::error::{CaptureError, ConfigError};
use crate::motion::{CaptureDevice, MotionParams, MotionTracker};
use crate::platform::{Scheduler, TaskId};
use crate::quiz::{Question, QuestionBank};
use crate::settings::GameConfig;
use crate::sim::{Feedback, GameEvent, SessionClock, SessionState, TickInput, Token, tick};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Camera denied or lost; nothing is scheduled until it is granted
    AwaitingCamera,
    /// Frames and countdown running
    Playing,
    /// Countdown reached zero; game-over delivered
    Finished,
    /// Abandoned by the player
    Stopped,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub phase: SessionPhase,
    pub score: u32,
    pub time_remaining: u32,
    pub question: &'a Question,
    pub question_index: usize,
    /// Player position (0-100)
    pub player_position: f32,
    pub tokens: &'a [Token],
    pub feedback: Option<&'a Feedback>,
}

/// Render/UI boundary. Purely a consumer of simulation state.
pub trait Presenter {
    /// Called after every simulation tick
    fn present(&mut self, frame: &RenderFrame<'_>);

    /// Camera access is needed before play can continue
    fn permission_required(&mut self, _error: &CaptureError) {}
}

/// Presenter that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: &RenderFrame<'_>) {}
}

/// Invoked once with the final score
pub type GameOverCallback = Box<dyn FnOnce(u32)>;

/// One game, from start to teardown
pub struct GameSession<D: CaptureDevice, P: Presenter> {
    config: GameConfig,
    bank: QuestionBank,
    state: SessionState,
    tracker: MotionTracker<D>,
    presenter: P,
    clock: SessionClock,
    scheduler: Scheduler,
    frame_task: Option<TaskId>,
    clock_task: Option<TaskId>,
    on_game_over: Option<GameOverCallback>,
    phase: SessionPhase,
}

impl<D: CaptureDevice, P: Presenter> GameSession<D, P> {
    /// Start a game at `now_ms`.
    ///
    /// If the camera cannot start, the session waits in
    /// [`SessionPhase::AwaitingCamera`] with nothing scheduled.
    pub fn start(
        config: GameConfig,
        bank: QuestionBank,
        device: D,
        presenter: P,
        seed: u64,
        now_ms: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let tracker = MotionTracker::new(device, MotionParams::from(&config));
        let state = SessionState::new(seed, &config, now_ms);
        let mut session = Self {
            config,
            bank,
            state,
            tracker,
            presenter,
            clock: SessionClock::new(),
            scheduler: Scheduler::new(),
            frame_task: None,
            clock_task: None,
            on_game_over: None,
            phase: SessionPhase::AwaitingCamera,
        };

        log::info!(
            "Session starting: seed {}, {} questions, {}s",
            seed,
            session.bank.len(),
            session.config.session_seconds
        );
        // Failure leaves the session in AwaitingCamera
        let _ = session.begin_play(now_ms);
        Ok(session)
    }

    /// Register the game-over callback
    pub fn on_game_over(&mut self, callback: impl FnOnce(u32) + 'static) {
        self.on_game_over = Some(Box::new(callback));
    }

    /// Ask for the camera again after a denial
    pub fn retry_camera(&mut self, now_ms: u64) -> Result<(), CaptureError> {
        if self.phase != SessionPhase::AwaitingCamera {
            return Ok(());
        }
        self.begin_play(now_ms)
    }

    fn begin_play(&mut self, now_ms: u64) -> Result<(), CaptureError> {
        if let Err(err) = self.tracker.activate() {
            self.suspend(&err);
            return Err(err);
        }
        self.frame_task = Some(self.scheduler.request_animation_frame(now_ms));
        self.clock_task = Some(self.scheduler.set_interval(now_ms, CLOCK_PERIOD_MS));
        self.phase = SessionPhase::Playing;
        Ok(())
    }

    /// Block play until the camera is available again
    fn suspend(&mut self, err: &CaptureError) {
        self.cancel_tasks();
        self.tracker.deactivate();
        // No ticks run while waiting, so catch feedback would never expire
        self.state.feedback = None;
        self.phase = SessionPhase::AwaitingCamera;
        self.presenter.permission_required(err);
    }

    /// Run every task due at `now_ms` and return what happened
    pub fn pump(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for id in self.scheduler.poll(now_ms) {
            if self.phase != SessionPhase::Playing {
                break;
            }
            if Some(id) == self.clock_task {
                self.on_clock_second(&mut events);
            } else if Some(id) == self.frame_task {
                self.frame_task = None;
                self.on_animation_frame(now_ms, &mut events);
            }
        }

        events
    }

    fn on_animation_frame(&mut self, now_ms: u64, events: &mut Vec<GameEvent>) {
        if let Err(err) = self.tracker.sample() {
            self.suspend(&err);
            return;
        }

        let input = TickInput {
            now_ms,
            player_position: self.tracker.position(),
        };
        events.extend(tick(&mut self.state, &self.bank, &self.config, &input));
        self.present();

        self.frame_task = Some(self.scheduler.request_animation_frame(now_ms));
    }

    fn on_clock_second(&mut self, events: &mut Vec<GameEvent>) {
        match self.clock.on_second(&mut self.state) {
            Some(GameEvent::GameOver { final_score }) => {
                events.push(GameEvent::GameOver { final_score });
                self.finish(final_score);
            }
            Some(event) => events.push(event),
            None => {}
        }
    }

    fn finish(&mut self, final_score: u32) {
        self.teardown();
        self.phase = SessionPhase::Finished;
        self.present();
        if let Some(callback) = self.on_game_over.take() {
            callback(final_score);
        }
    }

    /// Abandon the game (e.g. back to menu). No game-over is delivered.
    pub fn stop(&mut self) {
        if matches!(self.phase, SessionPhase::Stopped | SessionPhase::Finished) {
            return;
        }
        log::info!("Session stopped at score {}", self.state.score);
        self.teardown();
        self.state.terminate();
        self.phase = SessionPhase::Stopped;
    }

    fn cancel_tasks(&mut self) {
        if let Some(id) = self.frame_task.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.clock_task.take() {
            self.scheduler.cancel(id);
        }
    }

    fn teardown(&mut self) {
        self.cancel_tasks();
        self.scheduler.cancel_all();
        self.clock.stop();
        self.tracker.deactivate();
    }

    fn present(&mut self) {
        let frame = RenderFrame {
            phase: self.phase,
            score: self.state.score,
            time_remaining: self.state.time_remaining,
            question: self.bank.get(self.state.question_index),
            question_index: self.state.question_index,
            player_position: self.tracker.position(),
            tokens: &self.state.tokens,
            feedback: self.state.feedback.as_ref(),
        };
        self.presenter.present(&frame);
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Player position (0-100)
    pub fn player_position(&self) -> f32 {
        self.tracker.position()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn tracker(&self) -> &MotionTracker<D> {
        &self.tracker
    }

    pub fn device_mut(&mut self) -> &mut D {
        self.tracker.device_mut()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }
}

impl<D: CaptureDevice, P: Presenter> Drop for GameSession<D, P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::motion::SyntheticCamera;
    use crate::sim::tick::tests::drop_on_player;

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        last_score: u32,
        last_phase: Option<SessionPhase>,
        prompts: Vec<CaptureError>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, frame: &RenderFrame<'_>) {
            self.frames += 1;
            self.last_score = frame.score;
            self.last_phase = Some(frame.phase);
            assert!(frame.question_index < 3);
            assert!((0.0..=100.0).contains(&frame.player_position));
        }

        fn permission_required(&mut self, error: &CaptureError) {
            self.prompts.push(error.clone());
        }
    }

    fn config(seconds: u32) -> GameConfig {
        GameConfig {
            session_seconds: seconds,
            ..GameConfig::default()
        }
    }

    fn camera() -> SyntheticCamera {
        SyntheticCamera::new(64, 48)
    }

    fn start(seconds: u32, cam: SyntheticCamera) -> GameSession<SyntheticCamera, Recorder> {
        GameSession::start(
            config(seconds),
            QuestionBank::fallback(),
            cam,
            Recorder::default(),
            3,
            0,
        )
        .unwrap()
    }

    /// Pump at 60 fps from `from` to `to` (exclusive)
    fn run(
        session: &mut GameSession<SyntheticCamera, Recorder>,
        from: u64,
        to: u64,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut now = from;
        while now < to {
            events.extend(session.pump(now));
            now += 16;
        }
        events
    }

    #[test]
    fn test_start_schedules_frame_and_clock() {
        let session = start(60, camera());
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.scheduler().pending(), 2);
        assert!(session.tracker().device().is_streaming());
    }

    #[test]
    fn test_frames_tick_and_present() {
        let mut session = start(60, camera());
        run(&mut session, 0, 1000);
        assert!(session.presenter().frames > 50);
        assert_eq!(session.state().time_ticks as usize, session.presenter().frames);
        assert_eq!(session.scheduler().pending(), 2);
    }

    #[test]
    fn test_denied_camera_blocks_play() {
        let mut session = start(60, camera().denying_permission());
        assert_eq!(session.phase(), SessionPhase::AwaitingCamera);
        assert_eq!(session.presenter().prompts, vec![CaptureError::PermissionDenied]);
        assert_eq!(session.scheduler().pending(), 0);

        let events = run(&mut session, 0, 5000);
        assert!(events.is_empty());
        assert_eq!(session.state().time_remaining, 60);
        assert_eq!(session.presenter().frames, 0);
        assert_eq!(session.player_position(), 50.0);
    }

    #[test]
    fn test_retry_after_grant_starts_play() {
        let mut session = start(60, camera().denying_permission());
        session.device_mut().set_denied(false);
        session.retry_camera(100).unwrap();
        assert_eq!(session.phase(), SessionPhase::Playing);
        run(&mut session, 100, 1200);
        assert_eq!(session.state().time_remaining, 59);
    }

    #[test]
    fn test_lost_stream_suspends() {
        let mut session = start(60, camera().with_stream_limit(10));
        run(&mut session, 0, 1000);
        assert_eq!(session.phase(), SessionPhase::AwaitingCamera);
        assert_eq!(session.presenter().prompts, vec![CaptureError::StreamEnded]);
        assert_eq!(session.scheduler().pending(), 0);
        assert!(!session.tracker().device().is_streaming());
    }

    #[test]
    fn test_lost_stream_drops_feedback() {
        let mut session = start(60, camera().with_stream_limit(10));
        run(&mut session, 0, 100);
        session.state_mut().feedback = Some(Feedback::correct(10, 10_000));

        run(&mut session, 100, 1000);
        assert_eq!(session.phase(), SessionPhase::AwaitingCamera);
        assert!(session.state().feedback.is_none());
    }

    #[test]
    fn test_countdown_fires_game_over_once() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut session = start(3, camera());
        let sink = calls.clone();
        session.on_game_over(move |score| sink.borrow_mut().push(score));
        session.state_mut().score = 40;

        let events = run(&mut session, 0, 10_000);
        let overs: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(overs, vec![&GameEvent::GameOver { final_score: 40 }]);
        assert_eq!(*calls.borrow(), vec![40]);
        assert_eq!(session.phase(), SessionPhase::Finished);
        assert_eq!(session.presenter().last_phase, Some(SessionPhase::Finished));
        assert_eq!(session.scheduler().pending(), 0);
        assert!(!session.tracker().device().is_streaming());
    }

    #[test]
    fn test_no_score_changes_after_game_over() {
        let mut session = start(1, camera());
        run(&mut session, 0, 1010);
        assert_eq!(session.phase(), SessionPhase::Finished);
        let score = session.state().score;

        // A catch that was "in flight" when time ran out
        let config = session.config().clone();
        drop_on_player(session.state_mut(), &config, 50.0, true);
        let events = run(&mut session, 1010, 3000);
        assert!(events.is_empty());
        assert_eq!(session.state().score, score);
        assert_eq!(session.state().tokens.len(), 1);
    }

    #[test]
    fn test_late_pump_scores_then_ends_once() {
        let mut session = start(1, camera());
        run(&mut session, 0, 1000);
        let config = session.config().clone();
        let position = session.player_position();
        drop_on_player(session.state_mut(), &config, position, true);

        // Frame (992) and two clock periods (1000, 2000) are due at once
        let events = session.pump(2500);
        assert!(events.iter().any(|e| matches!(e, GameEvent::CorrectCatch { .. })));
        let overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert_eq!(events.last(), Some(&GameEvent::GameOver { final_score: 10 }));
        assert_eq!(session.presenter().last_score, 10);
        assert_eq!(session.scheduler().pending(), 0);
    }

    #[test]
    fn test_stop_tears_down_everything() {
        let calls = Rc::new(RefCell::new(0));
        let mut session = start(60, camera());
        let sink = calls.clone();
        session.on_game_over(move |_| *sink.borrow_mut() += 1);
        run(&mut session, 0, 500);

        session.stop();
        assert_eq!(session.phase(), SessionPhase::Stopped);
        assert_eq!(session.scheduler().pending(), 0);
        assert!(!session.tracker().device().is_streaming());

        let events = run(&mut session, 500, 120_000);
        assert!(events.is_empty());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_player_follows_performer() {
        let mut cam = camera();
        // Mirrored: camera 0.75 is screen 25%
        cam.set_performer_x(0.75);
        let mut session = start(60, cam);
        run(&mut session, 0, 2000);
        let pos = session.player_position();
        assert!((pos - 25.0).abs() < 3.0, "{pos}");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = config(60);
        bad.smoothing = 2.0;
        let result = GameSession::start(
            bad,
            QuestionBank::fallback(),
            camera(),
            NullPresenter,
            1,
            0,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
