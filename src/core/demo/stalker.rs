//=========================================================================
// Stalker Demo
//=========================================================================
//
// A walking character that follows the pointer.
//
// Each frame the sprite jumps to the first pointer moved this frame, or
// failing that, the first pointer pressed this frame. The walk cycle is
// driven by the render queue's animation updates.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::warn;

//=== Internal Dependencies ===============================================

use super::DemoUnit;
use crate::core::services::{
    Animation, Drawable, Services, Shared, SpriteBatch, TextureRegion, Vec2,
};

//=== Constants ===========================================================

const TEXTURE_PATH: &str = "p1_spritesheet.png";
const SPRITE_SIZE: Vec2 = Vec2::new(72.0, 97.0);
const FPS: u32 = 24;

const WALKING_FRAMES: [TextureRegion; 11] = [
    TextureRegion::new(0, 0, 72, 97),
    TextureRegion::new(73, 0, 72, 97),
    TextureRegion::new(146, 0, 72, 97),
    TextureRegion::new(0, 98, 72, 97),
    TextureRegion::new(73, 98, 72, 97),
    TextureRegion::new(146, 98, 72, 97),
    TextureRegion::new(219, 0, 72, 97),
    TextureRegion::new(292, 0, 72, 97),
    TextureRegion::new(219, 98, 72, 97),
    TextureRegion::new(365, 0, 72, 97),
    TextureRegion::new(292, 98, 72, 97),
];

//=== Stalker =============================================================

pub struct Stalker {
    services: Services,
    batch: Option<Shared<SpriteBatch>>,
    animation: Option<Shared<Animation>>,
    sprite: usize,
}

impl Stalker {
    pub fn new(services: &Services, width: f32, height: f32) -> Self {
        let mut batch = SpriteBatch::new(1);
        match services.textures().load(TEXTURE_PATH) {
            Ok(texture) => batch.set_texture(texture),
            Err(err) => warn!(target: "demo", "Stalker: {}, running untextured", err),
        }

        let start = services
            .input()
            .pointers_down()
            .first()
            .map(|p| p.position())
            .unwrap_or(Vec2::new(width * 0.5, height * 0.5));

        // A fresh batch of capacity 1 always has room.
        let sprite = batch.create_sprite(SPRITE_SIZE.x, SPRITE_SIZE.y).unwrap_or(0);
        if let Some(s) = batch.sprite_mut(sprite) {
            s.set_texture(WALKING_FRAMES[0]);
            s.set_position(start);
        }
        let batch = batch.into_shared();

        let animation =
            Animation::new(Rc::clone(&batch), sprite, WALKING_FRAMES.to_vec(), FPS, 0).into_shared();
        animation.borrow_mut().start();

        {
            let mut queue = services.render_queue();
            queue.add(Drawable::from(&batch));
            queue.add(Drawable::from(&animation));
        }

        Self {
            services: services.clone(),
            batch: Some(batch),
            animation: Some(animation),
            sprite,
        }
    }

    /// Current sprite position, while the demo is live.
    pub fn position(&self) -> Option<Vec2> {
        let batch = self.batch.as_ref()?.borrow();
        batch.sprite(self.sprite).map(|s| s.position)
    }
}

impl DemoUnit for Stalker {
    fn update(&mut self, _dt: f64) {
        let Some(batch) = &self.batch else {
            return;
        };

        let input = self.services.input();
        let target = input
            .pointers_moved()
            .first()
            .or_else(|| input.pointers_down().first());

        if let Some(pointer) = target {
            if let Some(sprite) = batch.borrow_mut().sprite_mut(self.sprite) {
                sprite.set_position(pointer.position());
            }
        }
    }

    fn deinit(&mut self) {
        let mut queue = self.services.render_queue();
        if let Some(animation) = self.animation.take() {
            animation.borrow_mut().stop();
            queue.erase(animation.borrow().id());
        }
        if let Some(batch) = self.batch.take() {
            queue.erase(batch.borrow().id());
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
