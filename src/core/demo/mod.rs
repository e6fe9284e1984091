//=========================================================================
// Demo Units
//=========================================================================
//
// The closed set of demos the session manager rotates through.
//
// Architecture:
//   Demo (enum, dispatch by variant)
//     ├─ Audial   scripted: audio load/play/pause/release sequence
//     ├─ Labels   scripted: endless text/colour cycle
//     ├─ Shaker   frame-driven: sprite batches grow while frames are fast
//     └─ Stalker  frame-driven: animated sprite follows the pointer
//
// Lifecycle:
//   Demo::init(kind) → update(dt)* → deinit()
//
//=========================================================================

//=== Module Declarations =================================================

mod audial;
mod labels;
mod shaker;
mod stalker;

//=== Public API ==========================================================

pub use audial::Audial;
pub use labels::Labels;
pub use shaker::Shaker;
pub use stalker::Stalker;

//=== External Dependencies ===============================================

use std::fmt;

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::script::CoroutineState;
use crate::core::services::Services;

//=== DemoUnit Trait ======================================================

/// Per-frame lifecycle shared by every demo.
///
/// Construction is the `init` step: each demo builds its resources (and
/// its script, if any) in its `new` function.
pub trait DemoUnit {
    /// Advances the demo by `dt` milliseconds.
    ///
    /// Safe to call at any time, including after the demo's script has
    /// finished or after `deinit`.
    fn update(&mut self, dt: f64);

    /// Releases every resource the demo still holds.
    ///
    /// Calling it again is a no-op.
    fn deinit(&mut self);

    /// State of the demo's script, for demos that have one.
    fn script_state(&self) -> Option<&CoroutineState> {
        None
    }
}

//=== DemoKind ============================================================

/// Identifies a demo variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoKind {
    Audial,
    Labels,
    Shaker,
    Stalker,
}

impl DemoKind {
    /// Default rotation order.
    pub const ALL: [DemoKind; 4] = [Self::Audial, Self::Labels, Self::Shaker, Self::Stalker];

    /// Position in [`DemoKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Audial => 0,
            Self::Labels => 1,
            Self::Shaker => 2,
            Self::Stalker => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Audial => "Audial",
            Self::Labels => "Labels",
            Self::Shaker => "Shaker",
            Self::Stalker => "Stalker",
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//=== Demo ================================================================

/// A running demo of any kind.
pub enum Demo {
    Audial(Audial),
    Labels(Labels),
    Shaker(Shaker),
    Stalker(Stalker),
}

impl Demo {
    /// Builds the demo `kind` for a `width` × `height` screen.
    pub fn init(kind: DemoKind, services: &Services, width: f32, height: f32) -> Self {
        info!(target: "demo", "Demo: {}", kind);

        match kind {
            DemoKind::Audial => Self::Audial(Audial::new(services, width, height)),
            DemoKind::Labels => Self::Labels(Labels::new(services, width, height)),
            DemoKind::Shaker => Self::Shaker(Shaker::new(services, width, height)),
            DemoKind::Stalker => Self::Stalker(Stalker::new(services, width, height)),
        }
    }

    pub fn kind(&self) -> DemoKind {
        match self {
            Self::Audial(_) => DemoKind::Audial,
            Self::Labels(_) => DemoKind::Labels,
            Self::Shaker(_) => DemoKind::Shaker,
            Self::Stalker(_) => DemoKind::Stalker,
        }
    }

    fn unit(&self) -> &dyn DemoUnit {
        match self {
            Self::Audial(d) => d,
            Self::Labels(d) => d,
            Self::Shaker(d) => d,
            Self::Stalker(d) => d,
        }
    }

    fn unit_mut(&mut self) -> &mut dyn DemoUnit {
        match self {
            Self::Audial(d) => d,
            Self::Labels(d) => d,
            Self::Shaker(d) => d,
            Self::Stalker(d) => d,
        }
    }
}

impl DemoUnit for Demo {
    fn update(&mut self, dt: f64) {
        self.unit_mut().update(dt);
    }

    fn deinit(&mut self) {
        self.unit_mut().deinit();
    }

    fn script_state(&self) -> Option<&CoroutineState> {
        self.unit().script_state()
    }
}

impl fmt::Debug for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Demo")
            .field("kind", &self.kind())
            .field("script", &self.script_state())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
