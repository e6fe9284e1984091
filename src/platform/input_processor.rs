//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit pointer events into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → InputBuffer
//
// Coordinates are converted from physical pixels (top-left origin) to
// logical pixels with a bottom-left origin, matching the demos' screen
// space. The processor tracks the scale factor, the logical window
// height and the last cursor position so button events can be placed.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, TouchPhase};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, Pointer, PointerId};

//=== InputProcessor ======================================================

/// Converts winit pointer events to engine InputEvents.
///
/// Only the primary (left) mouse button acts as a pointer; touches map
/// one-to-one by their platform id.
pub(crate) struct InputProcessor {
    scale_factor: f64,
    logical_height: f32,
    cursor: Option<PhysicalPosition<f64>>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(logical_height: f32) -> Self {
        Self {
            scale_factor: 1.0,
            logical_height,
            cursor: None,
        }
    }

    //--- Window State -----------------------------------------------------

    pub(crate) fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Tracks the window's inner size (physical pixels).
    pub(crate) fn resize(&mut self, size: PhysicalSize<u32>) {
        self.logical_height = size.to_logical::<f32>(self.scale_factor).height;
    }

    //--- Event Processing -------------------------------------------------

    /// Cursor motion; remembered for later button events.
    pub(crate) fn process_cursor_moved(&mut self, position: PhysicalPosition<f64>) -> InputEvent {
        self.cursor = Some(position);
        InputEvent::PointerMoved(self.to_pointer(PointerId::Mouse, position))
    }

    /// Cursor left the window; button events have no position until it
    /// comes back.
    pub(crate) fn cursor_left(&mut self) {
        self.cursor = None;
    }

    /// Left button press/release at the last known cursor position.
    pub(crate) fn process_mouse_button(
        &self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<InputEvent> {
        if button != MouseButton::Left {
            return None;
        }

        let pointer = self.to_pointer(PointerId::Mouse, self.cursor?);
        Some(match state {
            ElementState::Pressed => InputEvent::PointerDown(pointer),
            ElementState::Released => InputEvent::PointerUp(pointer),
        })
    }

    /// Touch start/move/end. A cancelled touch is treated as lifted.
    pub(crate) fn process_touch(
        &self,
        id: u64,
        phase: TouchPhase,
        location: PhysicalPosition<f64>,
    ) -> InputEvent {
        let pointer = self.to_pointer(PointerId::Touch(id), location);
        match phase {
            TouchPhase::Started => InputEvent::PointerDown(pointer),
            TouchPhase::Moved => InputEvent::PointerMoved(pointer),
            TouchPhase::Ended | TouchPhase::Cancelled => InputEvent::PointerUp(pointer),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn to_pointer(&self, id: PointerId, position: PhysicalPosition<f64>) -> Pointer {
        let logical = position.to_logical::<f32>(self.scale_factor);
        Pointer::new(id, logical.x, self.logical_height - logical.y)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64) -> PhysicalPosition<f64> {
        PhysicalPosition::new(x, y)
    }

    #[test]
    fn cursor_motion_flips_to_bottom_left_origin() {
        let mut processor = InputProcessor::new(600.0);
        let event = processor.process_cursor_moved(at(100.0, 50.0));
        assert_eq!(
            event.pointer().copied(),
            Some(Pointer::new(PointerId::Mouse, 100.0, 550.0))
        );
    }

    #[test]
    fn scale_factor_converts_to_logical() {
        let mut processor = InputProcessor::new(600.0);
        processor.set_scale_factor(2.0);
        let event = processor.process_cursor_moved(at(200.0, 100.0));
        assert_eq!(
            event.pointer().copied(),
            Some(Pointer::new(PointerId::Mouse, 100.0, 550.0))
        );
    }

    #[test]
    fn resize_updates_flip_height() {
        let mut processor = InputProcessor::new(600.0);
        processor.set_scale_factor(2.0);
        processor.resize(PhysicalSize::new(1600, 1000));
        let event = processor.process_touch(1, TouchPhase::Started, at(0.0, 0.0));
        assert_eq!(event.pointer().map(|p| p.y), Some(500.0));
    }

    #[test]
    fn button_uses_last_cursor_position() {
        let mut processor = InputProcessor::new(600.0);
        processor.process_cursor_moved(at(10.0, 20.0));

        let down = processor.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(down, Some(InputEvent::PointerDown(Pointer::new(PointerId::Mouse, 10.0, 580.0))));

        let up = processor.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(matches!(up, Some(InputEvent::PointerUp(_))));
    }

    #[test]
    fn button_without_cursor_is_dropped() {
        let mut processor = InputProcessor::new(600.0);
        assert_eq!(processor.process_mouse_button(MouseButton::Left, ElementState::Pressed), None);

        processor.process_cursor_moved(at(1.0, 1.0));
        processor.cursor_left();
        assert_eq!(processor.process_mouse_button(MouseButton::Left, ElementState::Pressed), None);
    }

    #[test]
    fn secondary_buttons_are_ignored() {
        let mut processor = InputProcessor::new(600.0);
        processor.process_cursor_moved(at(1.0, 1.0));
        assert_eq!(processor.process_mouse_button(MouseButton::Right, ElementState::Pressed), None);
    }

    #[test]
    fn touch_phases_map_to_pointer_events() {
        let processor = InputProcessor::new(600.0);
        let loc = at(5.0, 5.0);

        assert!(matches!(processor.process_touch(7, TouchPhase::Started, loc), InputEvent::PointerDown(p) if p.id == PointerId::Touch(7)));
        assert!(matches!(processor.process_touch(7, TouchPhase::Moved, loc), InputEvent::PointerMoved(_)));
        assert!(matches!(processor.process_touch(7, TouchPhase::Ended, loc), InputEvent::PointerUp(_)));
        assert!(matches!(processor.process_touch(7, TouchPhase::Cancelled, loc), InputEvent::PointerUp(_)));
    }
}
