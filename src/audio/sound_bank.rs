use std::path::Path;

use anyhow::{Context, Result};

use crate::traits::audio::{AudioBackend, SoundId};

/// One loaded step cue.
#[derive(Debug, Clone, Copy)]
pub struct BankEntry {
    pub sound: SoundId,
    pub duration_us: i64,
}

/// The fixed per-step cue sounds, loaded once at screen setup.
/// Step id `n` maps to the `n`th file handed to `load`.
pub struct SoundBank {
    entries: Vec<BankEntry>,
}

impl SoundBank {
    /// Load one cue per step, in step-id order. Step media ships with the
    /// app, so a missing or unreadable file is a hard error.
    pub fn load<A: AudioBackend, P: AsRef<Path>>(audio: &mut A, paths: &[P]) -> Result<Self> {
        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let sound = audio
                .load_sound(path)
                .with_context(|| format!("failed to load step cue {}", path.display()))?;
            let duration_us = audio.duration_us(sound)?;
            entries.push(BankEntry { sound, duration_us });
        }
        Ok(Self { entries })
    }

    /// Resolve a step id to its loaded cue.
    pub fn entry(&self, step: usize) -> Option<BankEntry> {
        self.entries.get(step).copied()
    }

    /// Number of loaded step cues.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One-shot feedback cue for a pressed button. Fire and forget: the
    /// backend lets overlapping one-shots ring out on their own.
    pub fn play_step<A: AudioBackend>(&self, audio: &mut A, step: usize) -> Result<()> {
        let entry = self
            .entry(step)
            .with_context(|| format!("no cue loaded for step {step}"))?;
        audio.play(entry.sound)
    }
}
