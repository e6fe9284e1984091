//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the demo core's logic thread.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  DemoRuntime     │
//  │   ↓                      │    │                  │
//  │  InputProcessor          │    │  PointerState    │
//  │   ├─ Physical → logical  │    │  ↓               │
//  │   └─ Flips to bottom-left│    │  DemoManager     │
//  │   ↓                      │    │  ↓               │
//  │  InputBuffer             │    │  Active demo     │
//  │   ├─ discrete: Vec<>     │    │                  │
//  │   └─ continuous: Vec<>   │    └──────────────────┘
//  │   ↓                      │             ↑
//  │  RedrawRequested         │             │
//  │   ↓ (flush)              │             │
//  │  Bounded Channel ────────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
//
//  Frame Boundary: RedrawRequested
//    → All buffered input sent at once
//    → Core ticks at fixed TPS (independent of refresh rate)
//    → Empty buffers are not sent
// ```
//
// Notes:
// - If the core thread dies, the platform logs a warning and keeps running
//   so the window can still be closed.
// - Winit requires the main thread on macOS/iOS, so this runs on the
//   thread that called `Engine::run()`.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::InputEvent;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== WindowConfig ========================================================

/// Window title and initial logical size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window owner and pointer event aggregator.
///
/// Runs on the main thread and sends one batch of pointer events per
/// redraw to the logic thread.
///
/// # Lifecycle
///
/// 1. `Platform::new(sender, config)` initializes subsystems
/// 2. `platform.run()` starts the event loop and blocks
/// 3. Winit calls the `ApplicationHandler` methods
/// 4. Closing the window sends `WindowClosed` and exits the loop
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` is called).
    window: Option<Window>,

    config: WindowConfig,

    /// Buffers pointer input until the frame boundary.
    buffer: InputBuffer,

    event_sender: Sender<PlatformEvent>,

    input_processor: InputProcessor,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens in `resumed()`.
    pub fn new(event_sender: Sender<PlatformEvent>, config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            input_processor: InputProcessor::new(config.height as f32),
            config,
            buffer: InputBuffer::new(),
            event_sender,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends everything buffered since the last redraw as one
    /// [`PlatformEvent::Inputs`] message.
    ///
    /// A disconnected channel (core thread gone) drops the events with a
    /// warning.
    fn flush_input_buffer(&mut self) {
        if let Some((discrete, continuous)) = self.buffer.drain() {
            let discrete_count = discrete.len();
            let continuous_count = continuous.len();

            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete_count,
                continuous_count
            );

            if self
                .event_sender
                .send(PlatformEvent::Inputs { discrete, continuous })
                .is_err()
            {
                warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} events",
                    discrete_count + continuous_count
                );
            }
        }
    }

    /// Routes a pointer-related window event into the buffer.
    fn buffer_pointer_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.process_cursor_moved(*position);
                self.buffer.push_continuous(event);
            }

            WindowEvent::CursorLeft { .. } => self.input_processor.cursor_left(),

            WindowEvent::MouseInput { state, button, .. } => {
                match self.input_processor.process_mouse_button(*button, *state) {
                    Some(event) => self.buffer.push_discrete(event),
                    None => trace!(target: "platform::input", "Mouse button ignored"),
                }
            }

            WindowEvent::Touch(touch) => {
                let event =
                    self.input_processor
                        .process_touch(touch.id, touch.phase, touch.location);
                match event {
                    InputEvent::PointerMoved(_) => self.buffer.push_continuous(event),
                    _ => self.buffer.push_discrete(event),
                }
            }

            WindowEvent::Focused(false) => self.buffer.push_discrete(InputEvent::Cancelled),

            _ => {}
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on first activation (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.input_processor.set_scale_factor(window.scale_factor());
                self.input_processor.resize(window.inner_size());
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                debug!(target: "platform", "Scale factor changed: {}", scale_factor);
                self.input_processor.set_scale_factor(*scale_factor);
            }

            WindowEvent::Resized(size) => {
                debug!(target: "platform", "Resized: {}x{}", size.width, size.height);
                self.input_processor.resize(*size);
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary
                self.flush_input_buffer();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            other => self.buffer_pointer_event(other),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
