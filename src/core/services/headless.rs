//=========================================================================
// Headless Backends
//=========================================================================
//
// Service implementations that keep full bookkeeping but produce no
// pixels or sound. Used by the windowed host (no GPU/audio device is
// wired up) and by tests, which inspect what each demo registered.
//
// Failure injection: paths listed as missing fail to load, and audio
// playback can be switched off, so recovery paths can be exercised.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::graphics::{Drawable, DrawableId, Texture};
use super::interface::{
    Audio, AudioError, Channel, GraphicsError, RenderQueue, Sound, SoundId, TextureLoader,
};

//=== HeadlessRenderQueue =================================================

/// Ordered list of registered drawables.
#[derive(Debug, Default)]
pub struct HeadlessRenderQueue {
    drawables: Vec<Drawable>,
}

impl HeadlessRenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered drawables in draw order.
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }
}

impl RenderQueue for HeadlessRenderQueue {
    fn add(&mut self, drawable: Drawable) {
        let id = drawable.id();
        if self.contains(id) {
            warn!("{} is already in the render queue, skipping add", id);
            return;
        }

        debug!("Render queue add {}", id);
        self.drawables.push(drawable);
    }

    fn erase(&mut self, id: DrawableId) {
        let before = self.drawables.len();
        self.drawables.retain(|d| d.id() != id);

        if self.drawables.len() < before {
            debug!("Render queue erase {}", id);
        } else {
            trace!("{} not in render queue, skipping erase", id);
        }
    }

    fn update(&mut self, dt: f64) {
        for drawable in &self.drawables {
            if let Drawable::Animation(animation) = drawable {
                animation.borrow_mut().update(dt);
            }
        }
    }

    fn len(&self) -> usize {
        self.drawables.len()
    }

    fn contains(&self, id: DrawableId) -> bool {
        self.drawables.iter().any(|d| d.id() == id)
    }
}

//=== HeadlessAudio =======================================================

/// Maximum simultaneous voices; the oldest voice is stolen beyond this.
pub const MAX_CHANNELS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Voice {
    channel: Channel,
    sound: SoundId,
    paused: bool,
    loops: u32,
}

/// Mixer that tracks loaded sounds and active voices.
#[derive(Debug, Default)]
pub struct HeadlessAudio {
    next_sound: u64,
    next_channel: u32,
    loaded: HashMap<SoundId, String>,
    voices: Vec<Voice>,
    missing: HashSet<String>,
    playback_disabled: bool,
}

impl HeadlessAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes loads of `path` fail.
    pub fn with_missing(mut self, path: impl Into<String>) -> Self {
        self.missing.insert(path.into());
        self
    }

    /// Makes every `play` fail.
    pub fn with_playback_disabled(mut self) -> Self {
        self.playback_disabled = true;
        self
    }

    /// Switches playback failure on or off at runtime.
    pub fn set_playback_disabled(&mut self, disabled: bool) {
        self.playback_disabled = disabled;
    }

    /// Voices currently allocated (playing or paused).
    pub fn active_channels(&self) -> usize {
        self.voices.len()
    }

    pub fn is_paused(&self, channel: Channel) -> Option<bool> {
        self.voice(channel).map(|v| v.paused)
    }

    pub fn loop_count(&self, channel: Channel) -> Option<u32> {
        self.voice(channel).map(|v| v.loops)
    }

    //--- Internal Helpers -------------------------------------------------

    fn load(&mut self, path: &str, streaming: bool) -> Result<Sound, AudioError> {
        if self.missing.contains(path) {
            warn!("Audio asset '{}' not found", path);
            return Err(AudioError::NotFound(path.to_owned()));
        }

        self.next_sound += 1;
        let id = SoundId(self.next_sound);
        self.loaded.insert(id, path.to_owned());
        debug!("Loaded '{}' (streaming: {})", path, streaming);
        Ok(Sound::new(id, path, streaming))
    }

    fn voice(&self, channel: Channel) -> Option<&Voice> {
        self.voices.iter().find(|v| v.channel == channel)
    }

    fn voice_mut(&mut self, channel: Channel) -> Result<&mut Voice, AudioError> {
        self.voices
            .iter_mut()
            .find(|v| v.channel == channel)
            .ok_or(AudioError::UnknownChannel(channel))
    }
}

impl Audio for HeadlessAudio {
    fn load_stream(&mut self, path: &str) -> Result<Sound, AudioError> {
        self.load(path, true)
    }

    fn load_sound(&mut self, path: &str) -> Result<Sound, AudioError> {
        self.load(path, false)
    }

    fn play(&mut self, sound: &Sound) -> Result<Channel, AudioError> {
        if self.playback_disabled || !self.loaded.contains_key(&sound.id()) {
            return Err(AudioError::PlaybackFailed(sound.path().to_owned()));
        }

        if self.voices.len() >= MAX_CHANNELS {
            let stolen = self.voices.remove(0);
            trace!("All {} channels busy, stealing {}", MAX_CHANNELS, stolen.channel);
        }

        self.next_channel += 1;
        let channel = Channel(self.next_channel);
        self.voices.push(Voice {
            channel,
            sound: sound.id(),
            paused: false,
            loops: 0,
        });
        Ok(channel)
    }

    fn resume(&mut self, channel: Channel) -> Result<(), AudioError> {
        self.voice_mut(channel)?.paused = false;
        Ok(())
    }

    fn pause(&mut self, channel: Channel) -> Result<(), AudioError> {
        self.voice_mut(channel)?.paused = true;
        Ok(())
    }

    fn stop(&mut self, channel: Channel) -> Result<(), AudioError> {
        let before = self.voices.len();
        self.voices.retain(|v| v.channel != channel);
        if self.voices.len() == before {
            return Err(AudioError::UnknownChannel(channel));
        }
        Ok(())
    }

    fn set_loop_count(&mut self, channel: Channel, count: u32) -> Result<(), AudioError> {
        self.voice_mut(channel)?.loops = count;
        Ok(())
    }

    fn release(&mut self, sound: Sound) {
        let id = sound.id();
        self.voices.retain(|v| v.sound != id);

        match self.loaded.remove(&id) {
            Some(path) => debug!("Released '{}'", path),
            None => warn!("Released sound '{}' that was never loaded here", sound.path()),
        }
    }

    fn live_sounds(&self) -> usize {
        self.loaded.len()
    }
}

//=== HeadlessTextures ====================================================

/// Path-keyed texture cache.
#[derive(Debug, Default)]
pub struct HeadlessTextures {
    cache: HashMap<String, Texture>,
    missing: HashSet<String>,
}

impl HeadlessTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes loads of `path` fail.
    pub fn with_missing(mut self, path: impl Into<String>) -> Self {
        self.missing.insert(path.into());
        self
    }
}

impl TextureLoader for HeadlessTextures {
    fn load(&mut self, path: &str) -> Result<Texture, GraphicsError> {
        if self.missing.contains(path) {
            warn!("Texture '{}' not found", path);
            return Err(GraphicsError::TextureNotFound(path.to_owned()));
        }

        let texture = self
            .cache
            .entry(path.to_owned())
            .or_insert_with(|| {
                debug!("Loaded texture '{}'", path);
                Texture::new(path)
            })
            .clone();
        Ok(texture)
    }

    fn purge(&mut self) -> usize {
        let before = self.cache.len();
        self.cache.retain(|_, texture| texture.handle_count() > 1);
        before - self.cache.len()
    }

    fn live(&self) -> usize {
        self.cache.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
