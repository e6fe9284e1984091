//=========================================================================
// Demo Engine
//
// Main entry point that hosts the demo rotation in a window.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              └─ spawns the logic thread
//         ├─ with_channel_capacity()    runs the platform
//         ├─ with_window_size()         blocks until exit
//         ├─ with_initial_demo()
//         └─ with_seed()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::demo::DemoKind;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::{CoreConfig, CoreSystemsOrchestrator};
use crate::platform::{Platform, WindowConfig};

//=== Constants ===========================================================

const WINDOW_TITLE: &str = "Aetheric Demos";

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Window size**: 800×600 logical pixels
/// - **Initial demo**: [`DemoKind::Stalker`]
/// - **Seed**: from entropy
///
/// # Examples
///
/// ```no_run
/// use aetheric_demos::EngineBuilder;
/// use aetheric_demos::core::demo::DemoKind;
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_window_size(1024, 768)
///     .with_initial_demo(DemoKind::Labels)
///     .with_seed(42)
///     .build()
///     .run();
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    width: u32,
    height: u32,
    initial_demo: DemoKind,
    seed: Option<u64>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            width: 800,
            height: 600,
            initial_demo: DemoKind::Stalker,
            seed: None,
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the window's logical size. Demos lay themselves out against it.
    ///
    /// Default: 800×600
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.width = width;
        self.height = height;
        self
    }

    /// Selects the demo shown first.
    pub fn with_initial_demo(mut self, kind: DemoKind) -> Self {
        self.initial_demo = kind;
        self
    }

    /// Seeds the random source shared by the demos.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!(
            "Building engine (TPS: {}, channel: {}, window: {}x{}, first demo: {})",
            self.tps, self.channel_capacity, self.width, self.height, self.initial_demo
        );

        Engine {
            core: CoreConfig {
                width: self.width as f32,
                height: self.height as f32,
                initial_demo: self.initial_demo,
                seed: self.seed,
            },
            window: WindowConfig {
                title: WINDOW_TITLE.to_string(),
                width: self.width,
                height: self.height,
            },
            tps: self.tps,
            channel_capacity: self.channel_capacity,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Windowed demo host.
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► PointerState, DemoManager, animations
///   │
///   └─► Platform (Event Loop)
///         └─► Window, pointer polling
///
/// Communication: bounded channel (PlatformEvent)
/// ```
#[derive(Debug)]
pub struct Engine {
    core: CoreConfig,
    window: WindowConfig,
    tps: f64,
    channel_capacity: usize,
}

impl Engine {
    //--- Execution --------------------------------------------------------

    /// Starts the engine runtime and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the bounded platform → core channel
    /// 2. Spawns the logic thread running at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close the platform sends `WindowClosed`, the logic
    ///    thread tears the active demo down and exits, and is joined
    ///
    /// Platform errors are logged; the logic thread still shuts down
    /// because its channel disconnects.
    pub fn run(self) {
        info!("Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        info!("Channel created (capacity: {})", self.channel_capacity);

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle =
            CoreSystemsOrchestrator::new(self.core).spawn_core_thread(rx, self.tps);
        info!("Core logic thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, self.window);
        info!("Platform initialized, entering event loop");

        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Cleanup: wait for the logic thread -----------------------
        match core_handle.join() {
            Ok(()) => info!("Core thread terminated cleanly"),
            Err(e) => error!("Core thread panicked: {:?}", e),
        }

        info!("Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
