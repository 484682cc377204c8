use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::audio::{FinishFn, PlaybackScheduler, SoundBank, StepFn};
use crate::config::GameSettings;
use crate::database::HighscoreStore;
use crate::game::{PressOutcome, SequenceEngine};
use crate::traits::audio::AudioBackend;
use crate::traits::time::{SystemTimeProvider, TimeProvider};

/// Headless control flow for one game screen.
///
/// Owns the engine, the scheduler, and the clock; borrows the audio
/// backend, cue bank, and highscore store per call so the embedding layer
/// decides their lifetimes. The UI forwards button presses in, drives
/// `update` from its frame loop, and reacts to the returned outcomes:
/// it replays the grown sequence after a completed round and decides
/// when a rejected press leads to a restart.
pub struct GameSession<T: TimeProvider = SystemTimeProvider> {
    engine: SequenceEngine,
    scheduler: PlaybackScheduler,
    settings: GameSettings,
    rng: StdRng,
    time: T,
}

impl GameSession {
    pub fn new(settings: GameSettings) -> Self {
        Self::with_time(settings, SystemTimeProvider::new())
    }
}

impl<T: TimeProvider> GameSession<T> {
    /// Create a session over an explicit time source.
    pub fn with_time(settings: GameSettings, time: T) -> Self {
        let mut rng = StdRng::from_entropy();
        let engine = SequenceEngine::with_step_count(settings.step_count, &mut rng);
        let scheduler = PlaybackScheduler::new(settings.interval_us());
        Self {
            engine,
            scheduler,
            settings,
            rng,
            time,
        }
    }

    /// Begin the screen: read the persisted highscore once, then start the
    /// first round.
    pub fn start(
        &mut self,
        bank: &SoundBank,
        store: Option<&HighscoreStore>,
        on_step: StepFn,
        on_finish: FinishFn,
    ) -> Result<()> {
        if let Some(store) = store {
            self.engine.load_highscore(store.load()?);
        }
        self.restart(bank, on_step, on_finish)
    }

    /// Start a fresh game and play its one-step sequence immediately.
    pub fn restart(&mut self, bank: &SoundBank, on_step: StepFn, on_finish: FinishFn) -> Result<()> {
        self.engine.restart(&mut self.rng);
        debug!("starting a fresh round");
        let now = self.time.now_us();
        self.scheduler
            .play(bank, self.engine.sequence(), 0, now, on_step, on_finish)
    }

    /// Replay the current sequence after a completed round, delayed by
    /// `pre_sequence_delay` so the success feedback can land first.
    pub fn replay(&mut self, bank: &SoundBank, on_step: StepFn, on_finish: FinishFn) -> Result<()> {
        debug!("replaying {} steps", self.engine.sequence().len());
        let now = self.time.now_us();
        self.scheduler.play(
            bank,
            self.engine.sequence(),
            self.settings.pre_sequence_delay_us(),
            now,
            on_step,
            on_finish,
        )
    }

    /// Forward one button press.
    ///
    /// Returns `None` while a sequence is playing: input is gated and the
    /// press never reaches the engine. Otherwise the pressed step's cue
    /// sounds as feedback (even for a wrong or free-play press), the
    /// engine evaluates the press, and a beaten highscore is persisted
    /// before the outcome is handed back.
    pub fn press<A: AudioBackend>(
        &mut self,
        bank: &SoundBank,
        audio: &mut A,
        store: Option<&HighscoreStore>,
        id: usize,
    ) -> Result<Option<PressOutcome>> {
        if self.scheduler.is_active() {
            return Ok(None);
        }

        if id < bank.len() {
            bank.play_step(audio, id)?;
        }

        let outcome = self.engine.press(id, &mut self.rng);
        if let PressOutcome::Accepted {
            highscore_updated: true,
            ..
        } = outcome
        {
            info!("new highscore: {}", self.engine.highscore());
            if let Some(store) = store {
                store.save(self.engine.highscore())?;
            }
        }
        Ok(Some(outcome))
    }

    /// Drive playback. Call once per frame.
    pub fn update<A: AudioBackend>(&mut self, bank: &SoundBank, audio: &mut A) -> Result<()> {
        let now = self.time.now_us();
        self.scheduler.update(bank, audio, now)
    }

    /// Cancel playback, e.g. when the game screen is left.
    pub fn stop<A: AudioBackend>(&mut self, audio: &mut A) -> Result<()> {
        self.scheduler.stop(audio)
    }

    /// Switch to free play. Leaving free play is a `restart`.
    pub fn enter_free_play(&mut self) {
        info!("free play enabled");
        self.engine.enter_free_play();
    }

    /// Whether a sequence is currently playing (input is gated).
    pub fn is_playing(&self) -> bool {
        self.scheduler.is_active()
    }

    /// Read-only engine state for score and level display.
    pub fn engine(&self) -> &SequenceEngine {
        &self.engine
    }

    /// The session's time source; tests drive a mock clock through this.
    pub fn time(&self) -> &T {
        &self.time
    }
}
