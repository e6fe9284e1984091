//=========================================================================
// Demo Manager
//=========================================================================
//
// Drives the active demo and swaps to the next one when the "NEXT DEMO"
// button is pressed.
//
// Swap order:
//   deinit current → reclaim → build next → reclaim → replace session
//
// The old demo is fully torn down before the next one is constructed,
// and the session is replaced in a single assignment.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{error, info};

//=== Internal Dependencies ===============================================

use super::button::NextDemoButton;
use super::registry::DemoRegistry;
use super::SessionError;
use crate::core::demo::{Demo, DemoUnit};
use crate::core::services::{Services, Vec2};

//=== Session =============================================================

/// The active demo and its registry index.
#[derive(Debug)]
pub struct Session {
    index: usize,
    demo: Demo,
}

impl Session {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn demo(&self) -> &Demo {
        &self.demo
    }
}

//=== DemoManager =========================================================

/// Owns the running demo and the button that cycles it.
pub struct DemoManager {
    services: Services,
    registry: DemoRegistry,
    screen: Vec2,
    button: NextDemoButton,
    session: Session,
}

impl DemoManager {
    //--- Construction -----------------------------------------------------

    /// Builds demo `initial` for a `width` × `height` screen and registers
    /// the "NEXT DEMO" button.
    pub fn new(
        services: &Services,
        registry: DemoRegistry,
        width: f32,
        height: f32,
        initial: usize,
    ) -> Result<Self, SessionError> {
        if registry.is_empty() {
            return Err(SessionError::EmptyRegistry);
        }

        let demo = registry
            .create(initial, services, width, height)
            .ok_or(SessionError::IndexOutOfRange {
                index: initial,
                len: registry.len(),
            })?;
        let button = NextDemoButton::new(services, width);

        info!(
            target: "demo",
            "Demo session started on {}x{} with '{}'",
            width,
            height,
            registry.name(initial).unwrap_or("?")
        );

        Ok(Self {
            services: services.clone(),
            registry,
            screen: Vec2::new(width, height),
            button,
            session: Session { index: initial, demo },
        })
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances one frame.
    ///
    /// A press on the button swaps demos and the frame's `dt` is dropped.
    pub fn update(&mut self, dt: f64) {
        let pressed = self
            .services
            .input()
            .pointers_down()
            .first()
            .map(|p| p.position());

        if let Some(p) = pressed {
            if self.button.is_hit(p) {
                self.swap();
                return;
            }
        }

        self.session.demo.update(dt);
    }

    /// Replaces the active demo with the next one in the registry.
    pub fn swap(&mut self) {
        self.session.demo.deinit();
        self.services.reclaim();

        let next = (self.session.index + 1) % self.registry.len();
        let Some(demo) = self
            .registry
            .create(next, &self.services, self.screen.x, self.screen.y)
        else {
            error!(target: "demo", "No demo registered at index {}", next);
            return;
        };
        self.services.reclaim();

        self.session = Session { index: next, demo };
    }

    /// Tears down the active demo and the button.
    pub fn shutdown(mut self) {
        self.session.demo.deinit();
        self.button.remove(&self.services);
        self.services.reclaim();
        info!(target: "demo", "Demo session shut down");
    }

    //--- Queries ----------------------------------------------------------

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_index(&self) -> usize {
        self.session.index
    }

    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    pub fn button(&self) -> &NextDemoButton {
        &self.button
    }
}

impl fmt::Debug for DemoManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemoManager")
            .field("registry", &self.registry)
            .field("screen", &self.screen)
            .field("session", &self.session)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::demo::DemoKind;
    use crate::core::input::{InputEvent, Pointer, PointerId};
    use crate::core::services::testing::TestBackends;
    use std::cell::Cell;
    use std::rc::Rc;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn frame(t: &TestBackends, events: &[InputEvent]) {
        let mut input = t.services.input_mut();
        input.clear();
        input.process_events(events);
    }

    fn press(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown(Pointer::new(PointerId::Mouse, x, y))
    }

    fn manager(t: &TestBackends, initial: usize) -> DemoManager {
        DemoManager::new(&t.services, DemoRegistry::with_defaults(), W, H, initial).unwrap()
    }

    //--- Construction -----------------------------------------------------

    #[test]
    fn starts_on_requested_demo() {
        let t = TestBackends::new();
        let m = manager(&t, 3);
        assert_eq!(m.current_index(), 3);
        assert_eq!(m.session().demo().kind(), DemoKind::Stalker);
        assert_eq!(m.registry_len(), 4);
    }

    #[test]
    fn rejects_empty_registry_and_bad_index() {
        let t = TestBackends::new();
        let empty = DemoManager::new(&t.services, DemoRegistry::new(), W, H, 0);
        assert_eq!(empty.unwrap_err(), SessionError::EmptyRegistry);

        let bad = DemoManager::new(&t.services, DemoRegistry::with_defaults(), W, H, 4);
        assert_eq!(bad.unwrap_err(), SessionError::IndexOutOfRange { index: 4, len: 4 });
        assert_eq!(t.services.resource_count(), 0);
    }

    //--- Swapping ---------------------------------------------------------

    #[test]
    fn press_on_button_swaps_to_next() {
        let t = TestBackends::new();
        let mut m = manager(&t, 3);

        frame(&t, &[press(W - 16.0, 16.0)]);
        m.update(16.0);
        assert_eq!(m.current_index(), 0);
        assert_eq!(m.session().demo().kind(), DemoKind::Audial);
    }

    #[test]
    fn press_outside_button_is_forwarded_to_demo() {
        let t = TestBackends::new();
        let mut m = manager(&t, 3);

        frame(&t, &[press(W - 7.0, 16.0)]);
        m.update(16.0);
        assert_eq!(m.current_index(), 3);
    }

    #[test]
    fn only_first_press_is_tested() {
        let t = TestBackends::new();
        let mut m = manager(&t, 3);

        frame(
            &t,
            &[
                InputEvent::PointerDown(Pointer::new(PointerId::Touch(1), 10.0, 300.0)),
                InputEvent::PointerDown(Pointer::new(PointerId::Touch(2), W - 16.0, 16.0)),
            ],
        );
        m.update(16.0);
        assert_eq!(m.current_index(), 3);
    }

    #[test]
    fn swap_does_not_forward_dt() {
        let t = TestBackends::new();
        let mut m = manager(&t, 1);

        frame(&t, &[press(W - 16.0, 16.0)]);
        m.update(16.0);

        let Demo::Shaker(shaker) = m.session().demo() else {
            panic!("expected Shaker, got {:?}", m.session().demo());
        };
        assert_eq!(shaker.batch_count(), 0);

        frame(&t, &[]);
        m.update(16.0);
        let Demo::Shaker(shaker) = m.session().demo() else {
            panic!("expected Shaker");
        };
        assert_eq!(shaker.batch_count(), 1);
    }

    #[test]
    fn full_rotation_restores_index_and_resource_count() {
        let t = TestBackends::new();
        let mut m = manager(&t, 3);
        let baseline = t.services.resource_count();

        for _ in 0..m.registry_len() {
            frame(&t, &[press(W - 16.0, 16.0)]);
            m.update(16.0);
            frame(&t, &[]);
            for _ in 0..20 {
                m.update(16.0);
            }
        }

        assert_eq!(m.current_index(), 3);
        assert_eq!(t.services.resource_count(), baseline);
    }

    #[test]
    fn old_demo_is_torn_down_before_next_is_built() {
        let t = TestBackends::new();
        let live_at_build = Rc::new(Cell::new(usize::MAX));
        let probe = Rc::clone(&live_at_build);

        let registry = DemoRegistry::new()
            .with_kind(DemoKind::Stalker)
            .with_factory("probe", move |services, w, h| {
                probe.set(services.resource_count());
                Demo::init(DemoKind::Labels, services, w, h)
            });
        let mut m = DemoManager::new(&t.services, registry, W, H, 0).unwrap();

        frame(&t, &[press(W - 16.0, 16.0)]);
        m.update(16.0);

        // Only the button label survives the teardown.
        assert_eq!(live_at_build.get(), 1);
        assert_eq!(m.current_index(), 1);
    }

    #[test]
    fn shutdown_leaves_nothing_behind() {
        let t = TestBackends::new();
        let m = manager(&t, 0);
        m.shutdown();
        assert_eq!(t.services.resource_count(), 0);
    }
}
