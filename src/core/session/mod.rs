//=========================================================================
// Demo Session
//=========================================================================
//
// Owns the active demo and rotates through the registry on request.
//
// Architecture:
//   DemoManager
//     ├─ registry: DemoRegistry (ordered factories)
//     ├─ button:   NextDemoButton ("NEXT DEMO" label + hit test)
//     └─ session:  Session { index, demo }
//
// Flow:
//   update(dt) → first pointer pressed this frame hits button?
//                  yes → swap(), dt is not forwarded
//                  no  → demo.update(dt)
//
//=========================================================================

//=== Module Declarations =================================================

mod button;
mod manager;
mod registry;

//=== Public API ==========================================================

pub use button::{hit_test, NextDemoButton};
pub use manager::{DemoManager, Session};
pub use registry::{DemoFactory, DemoRegistry};

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Errors ==============================================================

/// Reasons a demo session can not be set up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("demo registry is empty")]
    EmptyRegistry,

    #[error("initial demo index {index} is out of range for {len} registered demos")]
    IndexOutOfRange { index: usize, len: usize },
}
