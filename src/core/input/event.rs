//=========================================================================
// Pointer Event Types
//
// Defines the internal representation of low-level pointer input.
//
// This module abstracts away platform-specific input (mouse buttons,
// cursor motion, touches) into one pointer model used by the demos.
//
// Responsibilities:
// - Represent presses, releases and motion of any pointer
// - Identify pointers across frames (mouse vs. individual touches)
// - Support coalescing of motion (last position wins per pointer)
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    PointerState (processes events per frame)
//         ↓
//    DemoManager / demos
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== Internal Dependencies ===============================================

use crate::core::services::Vec2;

//=== PointerId ===========================================================

/// Identifies a pointer for the lifetime of a press.
///
/// The mouse is a single pointer; every touch gets the id the platform
/// assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

//=== Pointer =============================================================

/// A pointer sample in screen space (logical pixels, bottom-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub fn new(id: PointerId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

//=== InputEvent ==========================================================

/// Low-level pointer event from the platform layer.
///
/// # Equality & Hashing Semantics
///
/// `PointerMoved` events compare equal when they refer to the same
/// pointer, regardless of coordinates, so the platform buffer can keep
/// only the latest motion per pointer.
///
/// ```text
/// PointerDown{Mouse, 1,1} == PointerDown{Mouse, 1,1}   ✓
/// PointerDown{Mouse, 1,1} == PointerDown{Mouse, 2,2}   ✗
/// PointerMoved{Mouse, ..} == PointerMoved{Mouse, ..}   ✓ (coalesced)
/// PointerMoved{Mouse, ..} == PointerMoved{Touch(1),..} ✗
/// ```
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    /// Pointer pressed (mouse button or touch start).
    PointerDown(Pointer),

    /// Pointer released.
    PointerUp(Pointer),

    /// Pointer moved to a new position.
    PointerMoved(Pointer),

    /// Platform cancelled every active touch.
    Cancelled,
}

impl InputEvent {
    /// Pointer carried by the event, if any.
    pub fn pointer(&self) -> Option<&Pointer> {
        match self {
            Self::PointerDown(p) | Self::PointerUp(p) | Self::PointerMoved(p) => Some(p),
            Self::Cancelled => None,
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (PointerDown(a), PointerDown(b)) | (PointerUp(a), PointerUp(b)) => a == b,
            // Motion: coordinates ignored, identity only
            (PointerMoved(a), PointerMoved(b)) => a.id == b.id,
            (Cancelled, Cancelled) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::PointerDown(p) | Self::PointerUp(p) => {
                p.id.hash(state);
                p.x.to_bits().hash(state);
                p.y.to_bits().hash(state);
            }
            Self::PointerMoved(p) => p.id.hash(state),
            Self::Cancelled => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    //--- Test Helpers -----------------------------------------------------

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn mouse(x: f32, y: f32) -> Pointer {
        Pointer::new(PointerId::Mouse, x, y)
    }

    //--- Equality ---------------------------------------------------------

    #[test]
    fn moves_of_same_pointer_are_equal() {
        let a = InputEvent::PointerMoved(mouse(1.0, 2.0));
        let b = InputEvent::PointerMoved(mouse(300.0, 400.0));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn moves_of_different_pointers_differ() {
        let a = InputEvent::PointerMoved(mouse(1.0, 2.0));
        let b = InputEvent::PointerMoved(Pointer::new(PointerId::Touch(7), 1.0, 2.0));
        assert_ne!(a, b);
    }

    #[test]
    fn presses_compare_coordinates() {
        let a = InputEvent::PointerDown(mouse(1.0, 2.0));
        let b = InputEvent::PointerDown(mouse(1.0, 3.0));
        assert_ne!(a, b);
        assert_ne!(a, InputEvent::PointerUp(mouse(1.0, 2.0)));
    }

    #[test]
    fn hash_set_coalesces_motion() {
        let mut set = HashSet::new();
        set.replace(InputEvent::PointerMoved(mouse(1.0, 1.0)));
        set.replace(InputEvent::PointerMoved(mouse(5.0, 5.0)));

        assert_eq!(set.len(), 1);
        let kept = set.iter().next().and_then(InputEvent::pointer).copied();
        assert_eq!(kept, Some(mouse(5.0, 5.0)));
    }

    #[test]
    fn cancelled_has_no_pointer() {
        assert!(InputEvent::Cancelled.pointer().is_none());
    }
}
