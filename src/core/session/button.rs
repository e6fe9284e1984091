//=========================================================================
// Next Demo Button
//=========================================================================
//
// Right-aligned "NEXT DEMO" label in the bottom-right corner, with a
// padded hit box. Screen space has its origin at the bottom left, so the
// label extends up from its anchor.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::services::{
    Drawable, DrawableId, Label, Services, Shared, TextAlignment, Vec2,
};

//=== Constants ===========================================================

const TEXT: &str = "NEXT DEMO";
const FONT: &str = "OpenSans-Light.ttf";
const FONT_SIZE: u32 = 24;
const MARGIN: f32 = 16.0;

/// Slack around the label that still counts as a hit.
pub const PADDING: f32 = 8.0;

//=== Hit Test ============================================================

/// Whether `p` falls inside the padded box of a right-aligned label of
/// `width` × `height` anchored at `pos`.
pub fn hit_test(pos: Vec2, width: f32, height: f32, padding: f32, p: Vec2) -> bool {
    p.x >= pos.x - width - padding
        && p.x <= pos.x + padding
        && p.y >= pos.y - padding
        && p.y <= pos.y + height + padding
}

//=== NextDemoButton ======================================================

#[derive(Debug)]
pub struct NextDemoButton {
    label: Shared<Label>,
    id: DrawableId,
    position: Vec2,
}

impl NextDemoButton {
    /// Creates the button for a screen `width` wide and registers it.
    pub fn new(services: &Services, width: f32) -> Self {
        let position = Vec2::new(width - MARGIN, MARGIN);
        let label = Label::new()
            .with_alignment(TextAlignment::Right)
            .with_font(FONT)
            .with_font_size(FONT_SIZE)
            .with_position(position)
            .with_text(TEXT)
            .into_shared();
        let id = label.borrow().id();
        services.render_queue().add(Drawable::from(&label));

        Self { label, id, position }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_hit(&self, p: Vec2) -> bool {
        let label = self.label.borrow();
        hit_test(self.position, label.width(), label.height(), PADDING, p)
    }

    /// Removes the label from the render queue.
    pub fn remove(&self, services: &Services) {
        services.render_queue().erase(self.id);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
