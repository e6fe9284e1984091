//=========================================================================
// Demo Registry
//=========================================================================
//
// Ordered list of demo factories. The session manager builds demos from
// it by index and wraps around at the end.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::demo::{Demo, DemoKind};
use crate::core::services::Services;

//=== DemoFactory =========================================================

/// Builds a demo for a `width` × `height` screen.
pub type DemoFactory = Box<dyn Fn(&Services, f32, f32) -> Demo>;

//=== DemoRegistry ========================================================

pub struct DemoRegistry {
    factories: Vec<(String, DemoFactory)>,
}

impl DemoRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Registry with one entry per built-in demo, in rotation order.
    pub fn with_defaults() -> Self {
        DemoKind::ALL
            .into_iter()
            .fold(Self::new(), |registry, kind| registry.with_kind(kind))
    }

    /// Appends the built-in demo `kind`.
    pub fn with_kind(self, kind: DemoKind) -> Self {
        self.with_factory(kind.name(), move |services, width, height| {
            Demo::init(kind, services, width, height)
        })
    }

    /// Appends a custom factory under `name`.
    pub fn with_factory<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Services, f32, f32) -> Demo + 'static,
    {
        let name = name.into();
        debug!(target: "demo", "Registered demo '{}' at index {}", name, self.factories.len());
        self.factories.push((name, Box::new(factory)));
        self
    }

    /// Index of the first entry registered under `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.factories.iter().position(|(n, _)| n == name)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.factories.get(index).map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Builds the demo at `index`, or `None` if there is no such entry.
    pub fn create(&self, index: usize, services: &Services, width: f32, height: f32) -> Option<Demo> {
        self.factories
            .get(index)
            .map(|(_, factory)| factory(services, width, height))
    }
}

impl Default for DemoRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for DemoRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.factories.iter().map(|(n, _)| n))
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
