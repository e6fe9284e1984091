//=========================================================================
// Shaker Demo
//=========================================================================
//
// Load test for the sprite renderer. While the average frame time over a
// short window stays fast, another full batch of sprites is added; every
// sprite is spun by a random angle each frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::f32::consts::PI;

use log::{debug, warn};
use rand::Rng;

//=== Internal Dependencies ===============================================

use super::DemoUnit;
use crate::core::services::{
    Drawable, Services, Shared, SpriteBatch, Texture, TextureRegion, Vec2,
};

//=== Constants ===========================================================

pub const MAX_NUM_SPRITES: usize = 256;

const TEXTURE_PATH: &str = "p1_spritesheet.png";
const SPRITE_SIZE: Vec2 = Vec2::new(72.0, 97.0);
const SPRITE_REGION: TextureRegion = TextureRegion::new(0, 0, 72, 97);

/// Number of recent frame times averaged.
const WINDOW: usize = 10;

/// Batches are added while the windowed average stays below this (ms).
const FAST_FRAME_MS: f64 = 20.0;

//=== Shaker ==============================================================

pub struct Shaker {
    services: Services,
    screen: Vec2,
    texture: Option<Texture>,
    batches: Vec<Shared<SpriteBatch>>,
    frame_times: VecDeque<f64>,
    active: bool,
}

impl Shaker {
    pub fn new(services: &Services, width: f32, height: f32) -> Self {
        let texture = match services.textures().load(TEXTURE_PATH) {
            Ok(texture) => Some(texture),
            Err(err) => {
                warn!(target: "demo", "Shaker: {}, running untextured", err);
                None
            }
        };

        Self {
            services: services.clone(),
            screen: Vec2::new(width, height),
            texture,
            batches: Vec::new(),
            frame_times: VecDeque::with_capacity(WINDOW),
            active: true,
        }
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn sprite_count(&self) -> usize {
        self.batches.iter().map(|b| b.borrow().len()).sum()
    }

    //--- Internal Helpers -------------------------------------------------

    /// Pushes `dt` into the window and returns the new average.
    fn record_frame(&mut self, dt: f64) -> f64 {
        if self.frame_times.len() >= WINDOW {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);
        self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64
    }

    fn spawn_batch(&mut self) {
        let mut batch = SpriteBatch::new(MAX_NUM_SPRITES);
        if let Some(texture) = &self.texture {
            batch.set_texture(texture.clone());
        }

        {
            let mut rng = self.services.rng();
            while let Some(index) = batch.create_sprite(SPRITE_SIZE.x, SPRITE_SIZE.y) {
                let position = Vec2::new(
                    rng.gen::<f32>() * self.screen.x,
                    rng.gen::<f32>() * self.screen.y,
                );
                if let Some(sprite) = batch.sprite_mut(index) {
                    sprite.set_position(position);
                    sprite.set_texture(SPRITE_REGION);
                }
            }
        }

        let batch = batch.into_shared();
        self.services.render_queue().add(Drawable::from(&batch));
        self.batches.push(batch);
        debug!(target: "demo", "Shaker: {} sprites", self.sprite_count());
    }
}

impl DemoUnit for Shaker {
    fn update(&mut self, dt: f64) {
        if !self.active {
            return;
        }

        if self.record_frame(dt) < FAST_FRAME_MS {
            self.spawn_batch();
        }

        let mut rng = self.services.rng();
        for batch in &self.batches {
            for sprite in batch.borrow_mut().sprites_mut() {
                sprite.rotate(rng.gen::<f32>() * PI);
            }
        }
    }

    fn deinit(&mut self) {
        self.active = false;

        let mut queue = self.services.render_queue();
        for batch in self.batches.drain(..).rev() {
            queue.erase(batch.borrow().id());
        }
        drop(queue);

        self.texture = None;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::testing::TestBackends;
    use crate::core::services::{HeadlessAudio, HeadlessTextures, RenderQueue};

    #[test]
    fn fast_frames_add_batches() {
        let t = TestBackends::new();
        let mut demo = Shaker::new(&t.services, 800.0, 600.0);

        demo.update(16.0);
        demo.update(16.0);
        assert_eq!(demo.batch_count(), 2);
        assert_eq!(demo.sprite_count(), 2 * MAX_NUM_SPRITES);
        assert_eq!(t.queue.borrow().len(), 2);
    }

    #[test]
    fn slow_average_stops_growth() {
        let t = TestBackends::new();
        let mut demo = Shaker::new(&t.services, 800.0, 600.0);

        demo.update(16.0);
        demo.update(40.0);
        assert_eq!(demo.batch_count(), 1);
    }

    #[test]
    fn window_forgets_old_frames() {
        let t = TestBackends::new();
        let mut demo = Shaker::new(&t.services, 800.0, 600.0);

        demo.update(300.0);
        for _ in 0..WINDOW - 1 {
            demo.update(1.0);
        }
        assert_eq!(demo.batch_count(), 0);

        // The 300 ms frame falls out of the window here.
        demo.update(1.0);
        assert_eq!(demo.batch_count(), 1);
    }

    #[test]
    fn sprites_are_placed_on_screen_and_spun() {
        let t = TestBackends::new();
        let mut demo = Shaker::new(&t.services, 800.0, 600.0);
        demo.update(16.0);

        let batch = demo.batches[0].borrow();
        assert!(batch.texture().is_some());
        for sprite in batch.sprites() {
            assert!((0.0..=800.0).contains(&sprite.position.x));
            assert!((0.0..=600.0).contains(&sprite.position.y));
            assert_eq!(sprite.region, Some(SPRITE_REGION));
            assert!((0.0..=PI).contains(&sprite.angle));
        }
    }

    #[test]
    fn missing_texture_runs_untextured() {
        let t = TestBackends::with(
            HeadlessAudio::new(),
            HeadlessTextures::new().with_missing(TEXTURE_PATH),
        );
        let mut demo = Shaker::new(&t.services, 800.0, 600.0);
        demo.update(16.0);

        assert_eq!(demo.batch_count(), 1);
        assert!(demo.batches[0].borrow().texture().is_none());
    }

    #[test]
    fn deinit_erases_every_batch() {
        let t = TestBackends::new();
        let mut demo = Shaker::new(&t.services, 800.0, 600.0);
        for _ in 0..5 {
            demo.update(10.0);
        }

        demo.deinit();
        demo.deinit();
        assert!(t.queue.borrow().is_empty());
        t.services.reclaim();
        assert_eq!(t.services.resource_count(), 0);
    }
}
