//=========================================================================
// Input System
//
// Pointer input for demos and the session manager.
//
// Responsibilities:
// - Define the portable pointer event model (`event`)
// - Maintain the per-frame pointer snapshot (`PointerState`)
//
// Notes:
// The snapshot is refreshed by the CoreSystemsOrchestrator at the start
// of each tick and read through `Services::input()` during updates.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod pointer_state;

//=== Public API ==========================================================

pub use event::{InputEvent, Pointer, PointerId};
pub use pointer_state::PointerState;
