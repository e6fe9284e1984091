//=========================================================================
// Core Systems Orchestrator
//
// Central coordinator for the demo core running on the logic
// (non-platform) thread.
//
// Responsibilities:
// - Build the engine services and the demo session on the logic thread
// - Receive platform events via the bounded channel
// - Feed pointer input, drive the active demo and tick animations
// - Maintain pacing using a fixed tick rate (TPS)
//
// Notes:
// Everything the demos touch is single-threaded (`Rc`/`RefCell`), so it
// is constructed inside the spawned thread and never crosses back. Only
// the plain `CoreConfig` is moved in.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod demo;
pub mod input;
pub mod platform_bridge;
pub mod script;
pub mod services;
pub mod session;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{error, info};

//=== Internal Dependencies ===============================================

use demo::DemoKind;
use input::InputEvent;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use services::Services;
use session::{DemoManager, DemoRegistry, SessionError};

//=== CoreConfig ==========================================================

/// Plain settings the logic thread needs to build the demo core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CoreConfig {
    pub width: f32,
    pub height: f32,
    pub initial_demo: DemoKind,
    pub seed: Option<u64>,
}

//=== DemoRuntime =========================================================

/// Services plus the demo session, advanced one tick at a time.
pub(crate) struct DemoRuntime {
    services: Services,
    manager: DemoManager,
}

impl DemoRuntime {
    /// Builds headless services and starts the configured demo.
    pub(crate) fn new(config: &CoreConfig) -> Result<Self, SessionError> {
        let services = match config.seed {
            Some(seed) => Services::headless().with_seed(seed),
            None => Services::headless(),
        };
        Self::with_services(services, config)
    }

    pub(crate) fn with_services(
        services: Services,
        config: &CoreConfig,
    ) -> Result<Self, SessionError> {
        let manager = DemoManager::new(
            &services,
            DemoRegistry::with_defaults(),
            config.width,
            config.height,
            config.initial_demo.index(),
        )?;

        Ok(Self { services, manager })
    }

    /// One frame: refresh pointer state, update the demo, then tick
    /// animations. `dt` is in milliseconds.
    pub(crate) fn tick(&mut self, batches: &[Vec<InputEvent>], dt: f64) {
        {
            let mut input = self.services.input_mut();
            input.clear();
            for batch in batches {
                input.process_events(batch);
            }
        }

        self.manager.update(dt);
        self.services.render_queue().update(dt);
    }

    #[cfg(test)]
    pub(crate) fn manager(&self) -> &DemoManager {
        &self.manager
    }

    #[cfg(test)]
    pub(crate) fn services(&self) -> &Services {
        &self.services
    }

    /// Tears the session down, leaving nothing registered.
    pub(crate) fn shutdown(self) {
        self.manager.shutdown();
    }
}

//=== CoreSystemsOrchestrator =============================================

/// Owns the logic thread's configuration until the thread is spawned.
pub(crate) struct CoreSystemsOrchestrator {
    config: CoreConfig,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub fn new(config: CoreConfig) -> Self {
        Self { config }
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the logic thread that ticks the demo core at a fixed
    // frequency (TPS - ticks per second).
    //
    // Each tick:
    //  1. Collects platform events
    //  2. Updates pointer state, the active demo and animations
    //  3. Sleeps to maintain pacing
    //  4. Exits cleanly when a shutdown signal is received
    //
    pub fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);
        let config = self.config;

        thread::spawn(move || {
            let mut runtime = match DemoRuntime::new(&config) {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Demo core failed to start: {}", e);
                    return;
                }
            };
            let mut collector = EventCollector::new(receiver);
            let mut last_tick = Instant::now();

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame() == TickControl::Exit {
                    info!("Core thread exiting.");
                    break;
                }

                //--- Step 2: Update the demo core --------------------------
                let dt = frame_start.duration_since(last_tick).as_secs_f64() * 1000.0;
                last_tick = frame_start;
                runtime.tick(collector.batches(), dt);

                //--- Step 3: Maintain pacing -------------------------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            runtime.shutdown();
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::demo::Demo;
    use crate::core::input::{Pointer, PointerId};
    use crossbeam_channel::bounded;

    fn config(initial_demo: DemoKind) -> CoreConfig {
        CoreConfig {
            width: 800.0,
            height: 600.0,
            initial_demo,
            seed: Some(3),
        }
    }

    fn press(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown(Pointer::new(PointerId::Mouse, x, y))
    }

    #[test]
    fn runtime_starts_on_configured_demo() {
        let runtime = DemoRuntime::new(&config(DemoKind::Shaker)).unwrap();
        assert_eq!(runtime.manager().session().demo().kind(), DemoKind::Shaker);
    }

    #[test]
    fn tick_swaps_on_button_press() {
        let mut runtime = DemoRuntime::new(&config(DemoKind::Stalker)).unwrap();

        runtime.tick(&[vec![press(784.0, 16.0)]], 16.0);
        assert_eq!(runtime.manager().session().demo().kind(), DemoKind::Audial);

        // Press state does not leak into the next frame.
        runtime.tick(&[], 16.0);
        assert_eq!(runtime.manager().session().demo().kind(), DemoKind::Audial);
    }

    #[test]
    fn tick_drives_scripts() {
        let mut runtime = DemoRuntime::new(&config(DemoKind::Audial)).unwrap();

        // 1120 ms elapsed: the first 1000 ms wait has fired exactly once.
        for _ in 0..70 {
            runtime.tick(&[], 16.0);
        }
        let Demo::Audial(audial) = runtime.manager().session().demo() else {
            panic!("expected Audial");
        };
        assert_eq!(audial.text(), "Streaming 'bgm.ogg'...");
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut runtime = DemoRuntime::new(&config(DemoKind::Shaker)).unwrap();
        for _ in 0..5 {
            runtime.tick(&[], 10.0);
        }

        let services = runtime.services().clone();
        runtime.shutdown();
        assert_eq!(services.resource_count(), 0);
    }

    #[test]
    fn core_thread_exits_on_window_closed() {
        let (tx, rx) = bounded(8);
        let handle = CoreSystemsOrchestrator::new(config(DemoKind::Labels))
            .spawn_core_thread(rx, 240.0);

        tx.send(PlatformEvent::Inputs {
            discrete: vec![press(784.0, 16.0)],
            continuous: vec![],
        })
        .unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert!(handle.join().is_ok());
    }

    #[test]
    fn core_thread_exits_on_disconnect() {
        let (tx, rx) = bounded::<PlatformEvent>(8);
        let handle = CoreSystemsOrchestrator::new(config(DemoKind::Stalker))
            .spawn_core_thread(rx, 240.0);

        drop(tx);
        assert!(handle.join().is_ok());
    }
}
