use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use kira::AudioManager as KiraAudioManager;
use kira::AudioManagerSettings;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};

use crate::traits::audio::{AudioBackend, SoundId};

/// Audio driver backed by kira for low-latency cue playback.
pub struct AudioDriver {
    manager: KiraAudioManager,
    /// Loaded sound data keyed by SoundId.
    sounds: HashMap<u64, StaticSoundData>,
    /// Active playback handles.
    handles: HashMap<u64, StaticSoundHandle>,
    /// Next sound ID to assign.
    next_id: u64,
}

impl AudioDriver {
    pub fn new() -> Result<Self> {
        let manager = KiraAudioManager::new(AudioManagerSettings::default())
            .map_err(|e| anyhow!("failed to create audio manager: {e}"))?;
        Ok(Self {
            manager,
            sounds: HashMap::new(),
            handles: HashMap::new(),
            next_id: 1,
        })
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl AudioBackend for AudioDriver {
    fn load_sound(&mut self, path: &Path) -> Result<SoundId> {
        let data = StaticSoundData::from_file(path)
            .map_err(|e| anyhow!("failed to load sound {}: {e}", path.display()))?;
        let id = self.alloc_id();
        self.sounds.insert(id, data);
        Ok(SoundId(id))
    }

    fn play(&mut self, id: SoundId) -> Result<()> {
        let data = self
            .sounds
            .get(&id.0)
            .ok_or_else(|| anyhow!("sound not found: {id:?}"))?
            .clone();
        let handle = self
            .manager
            .play(data)
            .map_err(|e| anyhow!("failed to play sound: {e}"))?;
        self.handles.insert(id.0, handle);
        Ok(())
    }

    fn stop(&mut self, id: SoundId) -> Result<()> {
        if let Some(mut handle) = self.handles.remove(&id.0) {
            handle.stop(Default::default());
        }
        Ok(())
    }

    fn duration_us(&self, id: SoundId) -> Result<i64> {
        let data = self
            .sounds
            .get(&id.0)
            .with_context(|| format!("sound not found: {id:?}"))?;
        Ok(data.duration().as_micros() as i64)
    }

    fn dispose(&mut self) -> Result<()> {
        for (_, mut handle) in self.handles.drain() {
            handle.stop(Default::default());
        }
        self.sounds.clear();
        Ok(())
    }
}
