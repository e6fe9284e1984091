//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_demos::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade
pub use crate::engine::{Engine, EngineBuilder};

// Demos and session
pub use crate::core::demo::{Demo, DemoKind, DemoUnit};
pub use crate::core::session::{DemoManager, DemoRegistry, SessionError};

// Scripting
pub use crate::core::script::{
    Coroutine, CoroutineState, Resumption, ScheduledScript, ScriptError, ScriptResult, Yielder,
};

// Services
pub use crate::core::services::{Audio, RenderQueue, Services, TextureLoader, Vec2};

// Input
pub use crate::core::input::{InputEvent, Pointer, PointerId, PointerState};
