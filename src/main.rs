//! Motion Catch demo entry point
//!
//! Plays one headless game against a synthetic camera. An autopilot walks
//! the on-camera performer toward correct answers and the presenter logs
//! what a renderer would draw. Runs fast-forward unless `--realtime`.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;

use motion_catch::demo::{Autopilot, performer_x_for};
use motion_catch::motion::SyntheticCamera;
use motion_catch::platform::{Clock, ManualClock, SystemClock};
use motion_catch::quiz::{JsonFileProvider, QuestionBank};
use motion_catch::sim::GameEvent;
use motion_catch::{
    App, AppPhase, CaptureError, Difficulty, GameConfig, Presenter, RenderFrame, SessionPhase,
};

#[derive(Parser, Debug)]
#[command(about = "Headless motion-controlled quiz catching game", version)]
struct Args {
    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Session length in seconds
    #[arg(long)]
    seconds: Option<u32>,
    /// easy, normal or hard
    #[arg(long)]
    difficulty: Option<String>,
    /// JSON file with GameConfig overrides
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON file with questions
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Refuse camera access
    #[arg(long)]
    deny_camera: bool,
    /// Pace frames with the wall clock instead of fast-forwarding
    #[arg(long)]
    realtime: bool,
    /// Simulated display refresh rate
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

/// Logs score, countdown and question changes
#[derive(Default)]
struct LogPresenter {
    last_score: u32,
    last_second: Option<u32>,
    last_question: Option<usize>,
}

impl Presenter for LogPresenter {
    fn present(&mut self, frame: &RenderFrame<'_>) {
        if self.last_question != Some(frame.question_index) {
            self.last_question = Some(frame.question_index);
            let answers = frame.question.answers().join(" | ");
            log::info!("Q: {} [{}]", frame.question.text(), answers);
        }
        if frame.score != self.last_score {
            self.last_score = frame.score;
            if let Some(feedback) = frame.feedback {
                log::info!("{} (score {})", feedback.message, frame.score);
            }
        }
        if self.last_second != Some(frame.time_remaining) {
            self.last_second = Some(frame.time_remaining);
            log::debug!(
                "{}s left, player at {:.1}%, {} tokens",
                frame.time_remaining,
                frame.player_position,
                frame.tokens.len()
            );
        }
    }

    fn permission_required(&mut self, error: &CaptureError) {
        log::warn!("Camera access required: {error}");
    }
}

/// Either pace with the wall clock or jump straight to the next frame
enum FrameClock {
    Realtime(SystemClock),
    FastForward(ManualClock),
}

impl FrameClock {
    fn now_ms(&self) -> u64 {
        match self {
            FrameClock::Realtime(clock) => clock.now_ms(),
            FrameClock::FastForward(clock) => clock.now_ms(),
        }
    }

    fn wait(&self, frame_ms: u64) {
        match self {
            FrameClock::Realtime(_) => thread::sleep(Duration::from_millis(frame_ms)),
            FrameClock::FastForward(clock) => clock.advance(frame_ms),
        }
    }
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(name) = &args.difficulty {
        let Some(preset) = Difficulty::from_str(name) else {
            bail!("unknown difficulty '{name}' (expected easy, normal or hard)");
        };
        config.apply_preset(preset);
    }
    if let Some(seconds) = args.seconds {
        config.session_seconds = seconds;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!(
        "Motion Catch starting: seed {}, {} difficulty, {}s",
        seed,
        config.difficulty.as_str(),
        config.session_seconds
    );

    let bank = match &args.questions {
        Some(path) => QuestionBank::load(&mut JsonFileProvider::new(path)),
        None => QuestionBank::fallback(),
    };

    let mut camera = SyntheticCamera::new(160, 120).with_noise(6, seed);
    camera.set_denied(args.deny_camera);

    let frame_ms = u64::from(1000 / args.fps.clamp(1, 1000));
    let clock = if args.realtime {
        FrameClock::Realtime(SystemClock::new())
    } else {
        FrameClock::FastForward(ManualClock::new(0))
    };

    let mut app: App<SyntheticCamera, LogPresenter> = App::new(config, seed);
    app.request_start();
    app.begin_session(bank, camera, LogPresenter::default(), clock.now_ms())?;

    let mut pilot = Autopilot::default();

    loop {
        let now = clock.now_ms();

        if let Some(session) = app.session_mut() {
            if session.phase() == SessionPhase::AwaitingCamera {
                bail!("camera unavailable, cannot play");
            }
            let target = pilot.step(session.state(), session.config());
            let mirror = session.config().mirror;
            session
                .device_mut()
                .set_performer_x(performer_x_for(target, mirror));
        }

        for event in app.pump(now) {
            match event {
                GameEvent::TokenSpawned { id, is_correct } => {
                    log::debug!("Spawned {id} (correct: {is_correct})");
                }
                GameEvent::SecondElapsed { remaining } if remaining % 10 == 0 => {
                    log::info!("{remaining}s remaining");
                }
                _ => {}
            }
        }

        if let AppPhase::GameOver { final_score } = app.phase() {
            println!("Game over! Final score: {final_score}");
            break;
        }

        clock.wait(frame_ms);
    }

    app.return_to_menu();
    Ok(())
}
