//=========================================================================
// Engine Service Interface
//=========================================================================
//
// Contracts between the demos and the engine subsystems they exercise.
//
// Rendering, audio and texture loading live outside the demo core; the
// demos only need the operations below. Backends are swapped without
// touching demo code.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::graphics::{Drawable, DrawableId, Texture};

//=== Errors ==============================================================

/// Audio subsystem failures. Scripts recover from these locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("failed to load '{0}'")]
    NotFound(String),

    #[error("failed to play '{0}'")]
    PlaybackFailed(String),

    #[error("unknown channel {0}")]
    UnknownChannel(Channel),
}

/// Texture loading failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    #[error("failed to load texture '{0}'")]
    TextureNotFound(String),
}

//=== Audio Handles =======================================================

/// Identity of a loaded sound buffer or stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub(crate) u64);

/// Owned handle to a loaded sound.
///
/// Not `Clone`: [`Audio::release`] consumes it, so a released sound can
/// not be played or released again.
#[derive(Debug, PartialEq, Eq)]
pub struct Sound {
    id: SoundId,
    path: String,
    streaming: bool,
}

impl Sound {
    pub(crate) fn new(id: SoundId, path: impl Into<String>, streaming: bool) -> Self {
        Self {
            id,
            path: path.into(),
            streaming,
        }
    }

    pub fn id(&self) -> SoundId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }
}

/// A playing (or paused) voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel(pub(crate) u32);

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel#{}", self.0)
    }
}

//=== RenderQueue =========================================================

/// Process-wide draw registration surface.
pub trait RenderQueue {
    /// Registers a drawable. Adding an already registered drawable is
    /// ignored.
    fn add(&mut self, drawable: Drawable);

    /// Removes a drawable. Safe for ids that were never added.
    fn erase(&mut self, id: DrawableId);

    /// Advances time-driven drawables (animations) by `dt` milliseconds.
    fn update(&mut self, dt: f64);

    /// Number of registered drawables.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, id: DrawableId) -> bool;
}

//=== Audio ===============================================================

/// Process-wide audio mixer.
pub trait Audio {
    /// Opens `path` for streaming playback.
    fn load_stream(&mut self, path: &str) -> Result<Sound, AudioError>;

    /// Decodes `path` fully into memory.
    fn load_sound(&mut self, path: &str) -> Result<Sound, AudioError>;

    /// Starts `sound` on a new channel.
    fn play(&mut self, sound: &Sound) -> Result<Channel, AudioError>;

    /// Continues a paused channel.
    fn resume(&mut self, channel: Channel) -> Result<(), AudioError>;

    fn pause(&mut self, channel: Channel) -> Result<(), AudioError>;

    fn stop(&mut self, channel: Channel) -> Result<(), AudioError>;

    /// Number of extra times the channel repeats before stopping.
    fn set_loop_count(&mut self, channel: Channel, count: u32) -> Result<(), AudioError>;

    /// Frees `sound`, stopping any channel still playing it.
    fn release(&mut self, sound: Sound);

    /// Number of loaded, unreleased sounds.
    fn live_sounds(&self) -> usize;
}

//=== TextureLoader =======================================================

/// Texture construction from asset paths.
pub trait TextureLoader {
    fn load(&mut self, path: &str) -> Result<Texture, GraphicsError>;

    /// Drops cached textures no one else holds. Returns how many went.
    fn purge(&mut self) -> usize;

    /// Number of textures currently resident.
    fn live(&self) -> usize;
}
