//=========================================================================
// Pointer State
//=========================================================================
//
// Pointer tracking with per-frame deltas.
//
// Architecture:
//   InputEvent → process_events() → held (persistent)
//                                 → down / moved (this frame only)
//
// Frame lifecycle: clear() → process_events() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, Pointer, PointerId};

//=== PointerState ========================================================

/// Tracks held pointers plus the pointers pressed and moved this frame.
///
/// Ordering is by arrival, so `pointers_down()[0]` is the first press of
/// the frame.
#[derive(Debug, Default)]
pub struct PointerState {
    //--- Persistent State (survives frame boundary) ----------------------
    held: Vec<Pointer>,

    //--- Frame Deltas (reset each frame via clear()) --------------------
    down_this_frame: Vec<Pointer>,
    moved_this_frame: Vec<Pointer>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears frame-specific samples (pressed/moved).
    pub fn clear(&mut self) {
        self.down_this_frame.clear();
        self.moved_this_frame.clear();
    }

    /// Applies a batch of events to the current frame.
    pub fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown(p) => {
                replace_or_push(&mut self.held, p);
                self.down_this_frame.push(p);
            }

            InputEvent::PointerUp(p) => {
                self.held.retain(|h| h.id != p.id);
            }

            InputEvent::PointerMoved(p) => {
                if let Some(h) = self.held.iter_mut().find(|h| h.id == p.id) {
                    *h = p;
                }
                // Latest position wins within a frame
                replace_or_push(&mut self.moved_this_frame, p);
            }

            InputEvent::Cancelled => {
                trace!("Pointer input cancelled, dropping {} held pointers", self.held.len());
                self.held.clear();
            }
        }
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// Pointers pressed during the current frame.
    pub fn pointers_down(&self) -> &[Pointer] {
        &self.down_this_frame
    }

    /// Pointers that moved during the current frame (latest sample each).
    pub fn pointers_moved(&self) -> &[Pointer] {
        &self.moved_this_frame
    }

    /// Pointers currently held, in press order.
    pub fn pointers_held(&self) -> &[Pointer] {
        &self.held
    }

    /// Returns `true` while `id` is held.
    pub fn is_held(&self, id: PointerId) -> bool {
        self.held.iter().any(|h| h.id == id)
    }
}

fn replace_or_push(list: &mut Vec<Pointer>, p: Pointer) {
    match list.iter_mut().find(|e| e.id == p.id) {
        Some(existing) => *existing = p,
        None => list.push(p),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
