//=========================================================================
// Graphics Primitives
//=========================================================================
//
// Drawable objects the demos create and register with the render queue.
//
// Architecture:
//   Drawable
//     ├─ Label        (text, colour, alignment, glyph-box metrics)
//     ├─ SpriteBatch  (fixed capacity, shared texture, sprites)
//     └─ Animation    (cycles texture regions on one batch sprite)
//
// Drawables are shared between their owning demo and the render queue
// through `Shared<T>` handles; a drawable is identified by `DrawableId`
// so it can be erased without holding the handle.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

//=== Shared Handles ======================================================

/// Single-threaded shared handle used for drawables.
pub type Shared<T> = Rc<RefCell<T>>;

fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

//=== Vec2 ================================================================

/// 2D point or extent in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

//=== Color ===============================================================

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

//=== TextureRegion =======================================================

/// Sub-rectangle of a texture, in texels (bottom-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRegion {
    pub left: u32,
    pub bottom: u32,
    pub width: u32,
    pub height: u32,
}

impl TextureRegion {
    pub const fn new(left: u32, bottom: u32, width: u32, height: u32) -> Self {
        Self { left, bottom, width, height }
    }
}

//=== DrawableId ==========================================================

/// Process-unique identity of a drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(u64);

impl DrawableId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drawable#{}", self.0)
    }
}

//=== Texture =============================================================

/// Reference-counted texture handle. Cloning shares the same texture.
#[derive(Debug, Clone)]
pub struct Texture {
    inner: Rc<TextureInfo>,
}

#[derive(Debug)]
struct TextureInfo {
    path: String,
}

impl Texture {
    pub(crate) fn new(path: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(TextureInfo { path: path.into() }),
        }
    }

    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// Number of live handles to this texture (cache entries included).
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    pub fn same_as(&self, other: &Texture) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

//=== Label ===============================================================

/// Horizontal anchoring of label text relative to its position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlignment {
    #[default]
    Left,
    Right,
    Center,
}

/// A block of text.
///
/// Metrics are a glyph-box estimate (half the font size per character of
/// the longest line, one font size per line).
#[derive(Debug)]
pub struct Label {
    id: DrawableId,
    text: String,
    color: Color,
    position: Vec2,
    alignment: TextAlignment,
    font: String,
    font_size: u32,
}

impl Label {
    pub fn new() -> Self {
        Self {
            id: DrawableId::next(),
            text: String::new(),
            color: Color::WHITE,
            position: Vec2::ZERO,
            alignment: TextAlignment::Left,
            font: String::new(),
            font_size: 12,
        }
    }

    //--- Builder ----------------------------------------------------------

    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Wraps the label in a shared handle.
    pub fn into_shared(self) -> Shared<Label> {
        shared(self)
    }

    //--- Mutation ---------------------------------------------------------

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    //--- Queries ----------------------------------------------------------

    pub fn id(&self) -> DrawableId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn width(&self) -> f32 {
        let longest = self.text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        longest as f32 * self.font_size as f32 * 0.5
    }

    pub fn height(&self) -> f32 {
        if self.text.is_empty() {
            return 0.0;
        }
        self.text.lines().count() as f32 * self.font_size as f32
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::new()
    }
}

//=== Sprite ==============================================================

/// One quad inside a [`SpriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub size: Vec2,
    pub position: Vec2,
    pub angle: f32,
    pub region: Option<TextureRegion>,
}

impl Sprite {
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Rotates by `radians` relative to the current angle.
    pub fn rotate(&mut self, radians: f32) {
        self.angle += radians;
    }

    pub fn set_texture(&mut self, region: TextureRegion) {
        self.region = Some(region);
    }
}

//=== SpriteBatch =========================================================

/// Fixed-capacity group of sprites sharing one texture.
#[derive(Debug)]
pub struct SpriteBatch {
    id: DrawableId,
    capacity: usize,
    texture: Option<Texture>,
    sprites: Vec<Sprite>,
}

impl SpriteBatch {
    pub fn new(capacity: usize) -> Self {
        Self {
            id: DrawableId::next(),
            capacity,
            texture: None,
            sprites: Vec::with_capacity(capacity),
        }
    }

    pub fn into_shared(self) -> Shared<SpriteBatch> {
        shared(self)
    }

    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }

    /// Creates a sprite and returns its index, or `None` when full.
    pub fn create_sprite(&mut self, width: f32, height: f32) -> Option<usize> {
        if self.sprites.len() >= self.capacity {
            return None;
        }

        self.sprites.push(Sprite {
            size: Vec2::new(width, height),
            position: Vec2::ZERO,
            angle: 0.0,
            region: None,
        });
        Some(self.sprites.len() - 1)
    }

    pub fn id(&self) -> DrawableId {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn sprite(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn sprite_mut(&mut self, index: usize) -> Option<&mut Sprite> {
        self.sprites.get_mut(index)
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

//=== Animation ===========================================================

/// Cycles a sprite through texture regions at a fixed frame rate.
///
/// `delay` is the number of extra frames the last region is held before
/// the cycle restarts.
#[derive(Debug)]
pub struct Animation {
    id: DrawableId,
    batch: Shared<SpriteBatch>,
    sprite: usize,
    frames: Vec<TextureRegion>,
    frame_time: f64,
    delay: u32,
    current: usize,
    idled: u32,
    accumulated: f64,
    running: bool,
}

impl Animation {
    pub fn new(
        batch: Shared<SpriteBatch>,
        sprite: usize,
        frames: Vec<TextureRegion>,
        fps: u32,
        delay: u32,
    ) -> Self {
        Self {
            id: DrawableId::next(),
            batch,
            sprite,
            frames,
            frame_time: 1000.0 / fps.max(1) as f64,
            delay,
            current: 0,
            idled: 0,
            accumulated: 0.0,
            running: false,
        }
    }

    pub fn into_shared(self) -> Shared<Animation> {
        shared(self)
    }

    pub fn start(&mut self) {
        self.running = true;
        self.apply_frame();
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulated = 0.0;
    }

    pub fn id(&self) -> DrawableId {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_frame(&self) -> usize {
        self.current
    }

    /// Advances by `dt` milliseconds, ticking once per elapsed frame time.
    pub fn update(&mut self, dt: f64) {
        if !self.running || self.frames.is_empty() {
            return;
        }

        self.accumulated += dt;
        while self.accumulated >= self.frame_time {
            self.accumulated -= self.frame_time;
            self.tick();
        }
    }

    fn tick(&mut self) {
        if self.current + 1 < self.frames.len() {
            self.current += 1;
        } else if self.idled < self.delay {
            self.idled += 1;
            return;
        } else {
            self.idled = 0;
            self.current = 0;
        }
        self.apply_frame();
    }

    fn apply_frame(&self) {
        let Some(region) = self.frames.get(self.current).copied() else {
            return;
        };
        if let Some(sprite) = self.batch.borrow_mut().sprite_mut(self.sprite) {
            sprite.set_texture(region);
        }
    }
}

//=== Drawable ============================================================

/// Anything the render queue can hold.
#[derive(Debug, Clone)]
pub enum Drawable {
    Label(Shared<Label>),
    SpriteBatch(Shared<SpriteBatch>),
    Animation(Shared<Animation>),
}

impl Drawable {
    pub fn id(&self) -> DrawableId {
        match self {
            Self::Label(l) => l.borrow().id(),
            Self::SpriteBatch(b) => b.borrow().id(),
            Self::Animation(a) => a.borrow().id(),
        }
    }
}

impl From<&Shared<Label>> for Drawable {
    fn from(label: &Shared<Label>) -> Self {
        Self::Label(Rc::clone(label))
    }
}

impl From<&Shared<SpriteBatch>> for Drawable {
    fn from(batch: &Shared<SpriteBatch>) -> Self {
        Self::SpriteBatch(Rc::clone(batch))
    }
}

impl From<&Shared<Animation>> for Drawable {
    fn from(animation: &Shared<Animation>) -> Self {
        Self::Animation(Rc::clone(animation))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Label ------------------------------------------------------------

    #[test]
    fn label_metrics_follow_longest_line() {
        let label = Label::new().with_font_size(20).with_text("ab\nabcd");
        assert_eq!(label.width(), 40.0);
        assert_eq!(label.height(), 40.0);
    }

    #[test]
    fn empty_label_has_no_extent() {
        let label = Label::new();
        assert_eq!(label.width(), 0.0);
        assert_eq!(label.height(), 0.0);
    }

    #[test]
    fn labels_get_distinct_ids() {
        assert_ne!(Label::new().id(), Label::new().id());
    }

    //--- SpriteBatch ------------------------------------------------------

    #[test]
    fn batch_refuses_sprites_beyond_capacity() {
        let mut batch = SpriteBatch::new(2);
        assert_eq!(batch.create_sprite(1.0, 1.0), Some(0));
        assert_eq!(batch.create_sprite(1.0, 1.0), Some(1));
        assert_eq!(batch.create_sprite(1.0, 1.0), None);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.capacity(), 2);
    }

    #[test]
    fn sprite_rotation_accumulates() {
        let mut batch = SpriteBatch::new(1);
        let i = batch.create_sprite(1.0, 1.0).unwrap();
        let sprite = batch.sprite_mut(i).unwrap();
        sprite.rotate(0.5);
        sprite.rotate(0.25);
        assert_eq!(sprite.angle, 0.75);
    }

    //--- Animation --------------------------------------------------------

    fn regions(n: u32) -> Vec<TextureRegion> {
        (0..n).map(|i| TextureRegion::new(i, 0, 1, 1)).collect()
    }

    #[test]
    fn animation_applies_first_frame_on_start() {
        let batch = SpriteBatch::new(1).into_shared();
        batch.borrow_mut().create_sprite(1.0, 1.0);
        let mut anim = Animation::new(Rc::clone(&batch), 0, regions(3), 10, 0);

        anim.start();
        assert_eq!(batch.borrow().sprite(0).unwrap().region, Some(TextureRegion::new(0, 0, 1, 1)));
    }

    #[test]
    fn animation_cycles_frames() {
        let batch = SpriteBatch::new(1).into_shared();
        batch.borrow_mut().create_sprite(1.0, 1.0);
        let mut anim = Animation::new(Rc::clone(&batch), 0, regions(3), 10, 0);
        anim.start();

        anim.update(100.0);
        assert_eq!(anim.current_frame(), 1);
        anim.update(200.0);
        assert_eq!(anim.current_frame(), 0);
        assert_eq!(batch.borrow().sprite(0).unwrap().region, Some(TextureRegion::new(0, 0, 1, 1)));
    }

    #[test]
    fn animation_holds_last_frame_for_delay() {
        let batch = SpriteBatch::new(1).into_shared();
        batch.borrow_mut().create_sprite(1.0, 1.0);
        let mut anim = Animation::new(batch, 0, regions(2), 10, 2);
        anim.start();

        anim.update(100.0);
        assert_eq!(anim.current_frame(), 1);
        anim.update(200.0);
        assert_eq!(anim.current_frame(), 1);
        anim.update(100.0);
        assert_eq!(anim.current_frame(), 0);
    }

    #[test]
    fn stopped_animation_does_not_advance() {
        let batch = SpriteBatch::new(1).into_shared();
        batch.borrow_mut().create_sprite(1.0, 1.0);
        let mut anim = Animation::new(batch, 0, regions(3), 10, 0);
        assert!(!anim.is_running());

        anim.update(1000.0);
        assert_eq!(anim.current_frame(), 0);

        anim.start();
        assert!(anim.is_running());
        anim.stop();
        assert!(!anim.is_running());
        anim.update(1000.0);
        assert_eq!(anim.current_frame(), 0);
    }

    //--- Texture ----------------------------------------------------------

    #[test]
    fn texture_clones_share_identity() {
        let a = Texture::new("p1_spritesheet.png");
        let b = a.clone();
        assert!(a.same_as(&b));
        assert_eq!(a.handle_count(), 2);
        assert!(!a.same_as(&Texture::new("p1_spritesheet.png")));
    }
}
