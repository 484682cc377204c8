use rand::Rng;

/// Number of distinct step cues (buttons) in the default game.
pub const STEP_COUNT: usize = 4;

/// Outcome of a single player press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Input was not evaluated: free play is active, or the id is outside
    /// the step alphabet. Callers must treat this as inert, not as a miss.
    Ignored,
    /// Valid id, wrong step. The cursor resets; sequence and level are
    /// left untouched. Restarting is the caller's decision.
    Rejected,
    /// Correct step.
    Accepted {
        /// The press completed the round and the sequence grew by one.
        level_increased: bool,
        /// The new level strictly exceeded the previous highscore.
        highscore_updated: bool,
    },
}

impl PressOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PressOutcome::Accepted { .. })
    }
}

/// State machine for one game in progress: the secret sequence, the
/// player's position within the current round, and score progression.
///
/// One instance per game screen; `restart` begins a fresh game in place.
pub struct SequenceEngine {
    sequence: Vec<usize>,
    cursor: u32,
    level: u32,
    highscore: u32,
    free_play: bool,
    step_count: usize,
}

impl SequenceEngine {
    /// Create an engine over the default four-step alphabet, with a fresh
    /// one-step sequence already drawn.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self::with_step_count(STEP_COUNT, rng)
    }

    /// Create an engine over an alphabet of `step_count` distinct steps.
    pub fn with_step_count<R: Rng>(step_count: usize, rng: &mut R) -> Self {
        let mut engine = Self {
            sequence: Vec::new(),
            cursor: 0,
            level: 1,
            highscore: 0,
            free_play: false,
            step_count,
        };
        engine.restart(rng);
        engine
    }

    /// Begin a fresh game: a single random step, level 1, free play off.
    /// The highscore carries over.
    pub fn restart<R: Rng>(&mut self, rng: &mut R) {
        self.sequence = vec![rng.gen_range(0..self.step_count)];
        self.cursor = 0;
        self.level = 1;
        self.free_play = false;
    }

    /// Overwrite the highscore from persisted storage.
    /// Ignored while free play is active, so a late async load cannot
    /// clobber a score the player has already beaten.
    pub fn load_highscore(&mut self, value: u32) {
        if self.free_play {
            return;
        }
        self.highscore = value;
    }

    /// Switch to free play: input is no longer validated and the secret
    /// sequence is hidden. Leaving free play happens via `restart`.
    pub fn enter_free_play(&mut self) {
        self.free_play = true;
    }

    /// The secret sequence for playback, empty while free play is active.
    pub fn sequence(&self) -> &[usize] {
        if self.free_play {
            &[]
        } else {
            &self.sequence
        }
    }

    /// Evaluate one player press.
    ///
    /// A correct press advances the cursor; the press that completes the
    /// round resets the cursor, raises the level, and appends one new
    /// random step. A wrong press only resets the cursor. Repeated step
    /// ids are legal, so each draw is independent and uniform.
    pub fn press<R: Rng>(&mut self, id: usize, rng: &mut R) -> PressOutcome {
        if self.free_play || id >= self.step_count {
            return PressOutcome::Ignored;
        }

        if id != self.sequence[self.cursor as usize] {
            self.cursor = 0;
            return PressOutcome::Rejected;
        }

        if self.cursor + 1 == self.level {
            self.cursor = 0;
            self.level += 1;
            self.sequence.push(rng.gen_range(0..self.step_count));
            let highscore_updated = self.level > self.highscore;
            if highscore_updated {
                self.highscore = self.level;
            }
            PressOutcome::Accepted {
                level_increased: true,
                highscore_updated,
            }
        } else {
            self.cursor += 1;
            PressOutcome::Accepted {
                level_increased: false,
                highscore_updated: false,
            }
        }
    }

    /// Current level. Equals the sequence length.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Number of correct presses accepted in the current round.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn highscore(&self) -> u32 {
        self.highscore
    }

    pub fn free_play(&self) -> bool {
        self.free_play
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    /// Replay the whole known sequence correctly, returning the final press
    /// outcome (the one that completes the round).
    fn complete_round(engine: &mut SequenceEngine, rng: &mut ChaCha8Rng) -> PressOutcome {
        let steps = engine.sequence().to_vec();
        let mut last = PressOutcome::Ignored;
        for id in steps {
            last = engine.press(id, rng);
        }
        last
    }

    #[test]
    fn restart_yields_single_step_at_level_one() {
        let mut rng = rng();
        let mut engine = SequenceEngine::new(&mut rng);
        engine.restart(&mut rng);

        assert_eq!(engine.level(), 1);
        assert_eq!(engine.sequence().len(), 1);
        assert!(engine.sequence()[0] < STEP_COUNT);
        assert_eq!(engine.cursor(), 0);
        assert!(!engine.free_play());
    }

    #[test]
    fn sequence_length_tracks_level() {
        let mut rng = rng();
        let mut engine = SequenceEngine::new(&mut rng);

        for _ in 0..10 {
            let outcome = complete_round(&mut engine, &mut rng);
            assert_eq!(
                outcome,
                PressOutcome::Accepted {
                    level_increased: true,
                    highscore_updated: true,
                }
            );
            assert_eq!(engine.sequence().len() as u32, engine.level());
            assert_eq!(engine.cursor(), 0);
        }
        assert_eq!(engine.level(), 11);
    }

    #[test]
    fn correct_press_advances_cursor_until_round_completes() {
        let mut rng = rng();
        let mut engine = SequenceEngine::new(&mut rng);

        // Grow to level 3 so there is a partial round to walk through.
        complete_round(&mut engine, &mut rng);
        complete_round(&mut engine, &mut rng);
        assert_eq!(engine.level(), 3);

        let steps = engine.sequence().to_vec();
        for (i, &id) in steps.iter().take(steps.len() - 1).enumerate() {
            let outcome = engine.press(id, &mut rng);
            assert_eq!(
                outcome,
                PressOutcome::Accepted {
                    level_increased: false,
                    highscore_updated: false,
                }
            );
            assert_eq!(engine.cursor(), i as u32 + 1);
        }

        let outcome = engine.press(*steps.last().unwrap(), &mut rng);
        assert!(matches!(
            outcome,
            PressOutcome::Accepted {
                level_increased: true,
                ..
            }
        ));
        assert_eq!(engine.level(), 4);
    }

    #[test]
    fn wrong_press_resets_cursor_only() {
        let mut rng = rng();
        let mut engine = SequenceEngine::new(&mut rng);
        complete_round(&mut engine, &mut rng);
        complete_round(&mut engine, &mut rng);

        let steps = engine.sequence().to_vec();
        engine.press(steps[0], &mut rng);
        assert_eq!(engine.cursor(), 1);

        // Any id other than the expected second step is a miss.
        let wrong = (steps[1] + 1) % STEP_COUNT;
        let outcome = engine.press(wrong, &mut rng);

        assert_eq!(outcome, PressOutcome::Rejected);
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.level(), 3);
        assert_eq!(engine.sequence(), steps.as_slice());
    }

    #[test]
    fn highscore_updates_only_on_strict_improvement() {
        let mut rng = rng();
        let mut engine = SequenceEngine::new(&mut rng);
        engine.load_highscore(3);

        // Levels 2 and 3 do not beat a highscore of 3.
        let outcome = complete_round(&mut engine, &mut rng);
        assert_eq!(
            outcome,
            PressOutcome::Accepted {
                level_increased: true,
                highscore_updated: false,
            }
        );
        complete_round(&mut engine, &mut rng);
        assert_eq!(engine.highscore(), 3);

        // Level 4 does.
        let outcome = complete_round(&mut engine, &mut rng);
        assert_eq!(
            outcome,
            PressOutcome::Accepted {
                level_increased: true,
                highscore_updated: true,
            }
        );
        assert_eq!(engine.highscore(), 4);
    }

    #[test]
    fn highscore_survives_restart() {
        let mut rng = rng();
        let mut engine = SequenceEngine::new(&mut rng);
        complete_round(&mut engine, &mut rng);
        assert_eq!(engine.highscore(), 2);

        engine.restart(&mut rng);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.highscore(), 2);
    }

    #[test]
    fn out_of_alphabet_press_is_ignored() {
        let mut rng = rng();
        let mut engine = SequenceEngine::new(&mut rng);

        assert_eq!(engine.press(STEP_COUNT, &mut rng), PressOutcome::Ignored);
        assert_eq!(engine.press(99, &mut rng), PressOutcome::Ignored);
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.level(), 1);
    }

    #[test]
    fn free_play_ignores_input_and_hides_sequence() {
        let mut rng = rng();
        let mut engine = SequenceEngine::new(&mut rng);
        complete_round(&mut engine, &mut rng);

        engine.enter_free_play();
        assert!(engine.free_play());
        assert!(engine.sequence().is_empty());

        for id in 0..STEP_COUNT {
            assert_eq!(engine.press(id, &mut rng), PressOutcome::Ignored);
        }
        assert_eq!(engine.level(), 2);
    }

    #[test]
    fn load_highscore_is_ignored_during_free_play() {
        let mut rng = rng();
        let mut engine = SequenceEngine::new(&mut rng);
        engine.load_highscore(5);
        engine.enter_free_play();

        engine.load_highscore(1);
        assert_eq!(engine.highscore(), 5);
    }

    #[test]
    fn restart_leaves_free_play() {
        let mut rng = rng();
        let mut engine = SequenceEngine::new(&mut rng);
        engine.enter_free_play();

        engine.restart(&mut rng);
        assert!(!engine.free_play());
        assert_eq!(engine.sequence().len(), 1);
    }

    #[test]
    fn custom_alphabet_bounds_draws_and_validation() {
        let mut rng = rng();
        let mut engine = SequenceEngine::with_step_count(2, &mut rng);

        for _ in 0..20 {
            complete_round(&mut engine, &mut rng);
        }
        assert!(engine.sequence().iter().all(|&id| id < 2));
        assert_eq!(engine.press(2, &mut rng), PressOutcome::Ignored);
    }
}
