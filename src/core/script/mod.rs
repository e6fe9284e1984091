//=========================================================================
// Script System
//=========================================================================
//
// Cooperative scripting primitives for demos.
//
// Architecture:
//   ScheduledScript
//     ├─ coroutine: Coroutine   (async body + yielder)
//     └─ timer: ScriptTimer     (elapsed / timeout)
//
// Flow:
//   Demo::update(dt) → ScheduledScript::update(dt)
//                    → ScriptTimer::advance(dt) → Coroutine::resume()
//
//=========================================================================

//=== Module Declarations =================================================

mod coroutine;
mod timer;

//=== Public API ==========================================================

pub use coroutine::{
    Coroutine, CoroutineId, CoroutineState, Resumption, ScriptError, ScriptResult, Suspend,
    Yielder, NEVER,
};
pub use timer::{ScheduledScript, ScriptTimer};
