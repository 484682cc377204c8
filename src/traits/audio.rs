use std::path::Path;

use anyhow::Result;

/// Handle for referencing loaded sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u64);

/// Abstraction over audio backends.
/// Implementations: AudioDriver (kira), local mocks in tests.
pub trait AudioBackend {
    fn load_sound(&mut self, path: &Path) -> Result<SoundId>;

    fn play(&mut self, id: SoundId) -> Result<()>;
    fn stop(&mut self, id: SoundId) -> Result<()>;

    /// Natural length of a loaded sound in microseconds.
    /// The playback scheduler paces itself by this, so it must be known
    /// for every loaded sound.
    fn duration_us(&self, id: SoundId) -> Result<i64>;

    fn dispose(&mut self) -> Result<()>;
}
