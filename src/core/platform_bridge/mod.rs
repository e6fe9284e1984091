//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit) with the demo core.
//
// This module defines the contract between platform implementations and
// core logic, so the windowing backend can change without touching the
// demos.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Core-side event collection and buffering
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::PlatformEvent;

//=== Public API ==========================================================

pub use interface::PlatformError;
