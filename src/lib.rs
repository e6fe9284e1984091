//=========================================================================
// Aetheric Demos - Library Root
//
// Scripted demos driven by cooperative coroutines, hosted in a winit
// window.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Expose the demo core (`core`) for headless embedding and tests
// - Keep the platform layer (window, winit integration) private
//
// Typical usage:
// ```no_run
// use aetheric_demos::EngineBuilder;
//
// fn main() {
//     EngineBuilder::new().build().run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the coroutine runtime, services, demos and the session
// manager. It can be driven without a window through `DemoManager`.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the winit integration and is not part of the
// public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
