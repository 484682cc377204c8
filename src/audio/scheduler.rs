use std::collections::VecDeque;

use anyhow::{Context, Result};

use crate::audio::SoundBank;
use crate::traits::audio::{AudioBackend, SoundId};

/// Callback fired as each step starts sounding: (step id, cue duration in
/// microseconds). UIs use the duration to time the button flash.
pub type StepFn = Box<dyn FnMut(usize, i64)>;

/// Callback fired exactly once after the last step has finished sounding.
pub type FinishFn = Box<dyn FnOnce()>;

/// Where a session is within its current step.
#[derive(Debug, Clone, Copy)]
enum Phase {
    /// Counting down the gap before the next step starts sounding.
    /// The step is already resolved against the bank at this point.
    Delaying {
        step: usize,
        sound: SoundId,
        duration_us: i64,
        deadline_us: i64,
    },
    /// A step's cue is sounding until its natural length elapses.
    Playing { sound: SoundId, ends_at_us: i64 },
}

/// One playback session: the steps still to emit and the callbacks bound
/// at the `play` call. Dropped wholesale on drain or stop, so closures
/// can never leak into a later session.
struct PlaySession {
    queue: VecDeque<usize>,
    phase: Phase,
    on_step: StepFn,
    on_finish: FinishFn,
}

/// Replays a step sequence one cue at a time: `initial_delay` before the
/// first step, then each step after the previous one finished plus a fixed
/// `interval` gap. Steps never overlap.
///
/// Driven from a single-threaded poll loop: call `update` with the current
/// time each frame. `stop` is level-triggered: once called, no step or
/// finish callback from the in-flight session can fire, even if its
/// deadline had already passed.
pub struct PlaybackScheduler {
    interval_us: i64,
    session: Option<PlaySession>,
}

impl PlaybackScheduler {
    /// Create a scheduler with a fixed inter-step gap.
    pub fn new(interval_us: i64) -> Self {
        Self {
            interval_us,
            session: None,
        }
    }

    /// Begin (or re-arm) a playback session.
    ///
    /// Replaces any in-flight session wholesale, so a stale deadline can
    /// never fire an old closure. An empty sequence invokes `on_finish`
    /// immediately.
    ///
    /// Fails if the first step has no loaded cue in the bank; a session
    /// that fails this way is dead, not retried.
    pub fn play(
        &mut self,
        bank: &SoundBank,
        sequence: &[usize],
        initial_delay_us: i64,
        now_us: i64,
        on_step: StepFn,
        on_finish: FinishFn,
    ) -> Result<()> {
        self.session = None;

        let mut queue: VecDeque<usize> = sequence.iter().copied().collect();
        let Some(step) = queue.pop_front() else {
            on_finish();
            return Ok(());
        };
        let entry = bank
            .entry(step)
            .with_context(|| format!("no cue loaded for step {step}"))?;

        self.session = Some(PlaySession {
            queue,
            phase: Phase::Delaying {
                step,
                sound: entry.sound,
                duration_us: entry.duration_us,
                deadline_us: now_us + initial_delay_us,
            },
            on_step,
            on_finish,
        });
        Ok(())
    }

    /// Drive the session forward. Call once per poll tick.
    pub fn update<A: AudioBackend>(
        &mut self,
        bank: &SoundBank,
        audio: &mut A,
        now_us: i64,
    ) -> Result<()> {
        let phase = match self.session.as_ref() {
            Some(session) => session.phase,
            None => return Ok(()),
        };
        match phase {
            Phase::Delaying {
                step,
                sound,
                duration_us,
                deadline_us,
            } => {
                if now_us >= deadline_us {
                    if let Some(session) = self.session.as_mut() {
                        (session.on_step)(step, duration_us);
                        session.phase = Phase::Playing {
                            sound,
                            ends_at_us: now_us + duration_us,
                        };
                    }
                    audio.play(sound)?;
                }
            }
            Phase::Playing { ends_at_us, .. } => {
                if now_us >= ends_at_us {
                    self.advance(bank, now_us, self.interval_us)?;
                }
            }
        }
        Ok(())
    }

    /// Cancel the in-flight session and silence the current cue.
    /// Idempotent; guarantees no further callbacks from this session.
    pub fn stop<A: AudioBackend>(&mut self, audio: &mut A) -> Result<()> {
        if let Some(session) = self.session.take() {
            if let Phase::Playing { sound, .. } = session.phase {
                audio.stop(sound)?;
            }
        }
        Ok(())
    }

    /// Whether a session is in flight. UIs keep input disabled while true.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Move to the next step after a gap, or drain: the whole session goes
    /// away before `on_finish` fires, so nothing survives into the next
    /// `play` call.
    fn advance(&mut self, bank: &SoundBank, now_us: i64, delay_us: i64) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        match session.queue.pop_front() {
            Some(step) => {
                let entry = bank
                    .entry(step)
                    .with_context(|| format!("no cue loaded for step {step}"))?;
                session.phase = Phase::Delaying {
                    step,
                    sound: entry.sound,
                    duration_us: entry.duration_us,
                    deadline_us: now_us + delay_us,
                };
            }
            None => {
                if let Some(session) = self.session.take() {
                    (session.on_finish)();
                }
            }
        }
        Ok(())
    }
}
