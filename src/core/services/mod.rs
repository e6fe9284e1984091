//=========================================================================
// Engine Services
//=========================================================================
//
// Shared context handed to demos.
//
// Contains the process-wide subsystems demos mutate:
// - render_queue: drawable registration
// - audio: sound loading and playback
// - textures: texture loading and reclamation
// - input: pointer snapshot for the current frame
// - rng: seeded random source
//
// `Services` is a bundle of `Rc` handles; cloning it is cheap and every
// clone talks to the same subsystems. It never leaves the logic thread.
//
//=========================================================================

//=== Module Declarations =================================================

mod graphics;
mod headless;
mod interface;

//=== Public API ==========================================================

pub use graphics::{
    Animation, Color, Drawable, DrawableId, Label, Shared, Sprite, SpriteBatch, TextAlignment,
    Texture, TextureRegion, Vec2,
};
pub use headless::{HeadlessAudio, HeadlessRenderQueue, HeadlessTextures, MAX_CHANNELS};
pub use interface::{
    Audio, AudioError, Channel, GraphicsError, RenderQueue, Sound, SoundId, TextureLoader,
};

//=== External Dependencies ===============================================

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

//=== Internal Dependencies ===============================================

use crate::core::input::PointerState;

//=== Services ============================================================

/// Shared handles to every engine subsystem a demo may touch.
#[derive(Clone)]
pub struct Services {
    render_queue: Rc<RefCell<dyn RenderQueue>>,
    audio: Rc<RefCell<dyn Audio>>,
    textures: Rc<RefCell<dyn TextureLoader>>,
    input: Rc<RefCell<PointerState>>,
    rng: Rc<RefCell<StdRng>>,
}

impl Services {
    //--- Construction -----------------------------------------------------

    /// Bundles the given backends with an empty pointer state and an
    /// entropy-seeded RNG.
    pub fn new(
        render_queue: Rc<RefCell<dyn RenderQueue>>,
        audio: Rc<RefCell<dyn Audio>>,
        textures: Rc<RefCell<dyn TextureLoader>>,
    ) -> Self {
        Self {
            render_queue,
            audio,
            textures,
            input: Rc::new(RefCell::new(PointerState::new())),
            rng: Rc::new(RefCell::new(StdRng::from_entropy())),
        }
    }

    /// Services backed by the headless implementations.
    pub fn headless() -> Self {
        Self::new(
            Rc::new(RefCell::new(HeadlessRenderQueue::new())),
            Rc::new(RefCell::new(HeadlessAudio::new())),
            Rc::new(RefCell::new(HeadlessTextures::new())),
        )
    }

    /// Reseeds the random source so runs are reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.borrow_mut() = StdRng::seed_from_u64(seed);
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn render_queue(&self) -> RefMut<'_, dyn RenderQueue> {
        self.render_queue.borrow_mut()
    }

    pub fn audio(&self) -> RefMut<'_, dyn Audio> {
        self.audio.borrow_mut()
    }

    pub fn textures(&self) -> RefMut<'_, dyn TextureLoader> {
        self.textures.borrow_mut()
    }

    pub fn input(&self) -> Ref<'_, PointerState> {
        self.input.borrow()
    }

    pub fn input_mut(&self) -> RefMut<'_, PointerState> {
        self.input.borrow_mut()
    }

    pub fn rng(&self) -> RefMut<'_, StdRng> {
        self.rng.borrow_mut()
    }

    //--- Resource Management ----------------------------------------------

    /// Reclamation hint: drops resources nothing references any more.
    pub fn reclaim(&self) {
        let purged = self.textures.borrow_mut().purge();
        if purged > 0 {
            debug!("Reclaimed {} unreferenced textures", purged);
        }
    }

    /// Render registrations + live sounds + resident textures.
    pub fn resource_count(&self) -> usize {
        self.render_queue.borrow().len()
            + self.audio.borrow().live_sounds()
            + self.textures.borrow().live()
    }
}

//=========================================================================
// Test Support
//=========================================================================


//=========================================================================
// Unit Tests
//=========================================================================
