//=========================================================================
// Script Timer
//=========================================================================
//
// Converts accumulated frame deltas into coroutine resumptions.
//
// Policy:
//   elapsed += dt
//   elapsed >= timeout  →  elapsed = 0, resume, timeout = next wait
//
// At most one resume fires per update. Time beyond the threshold is
// dropped, not carried into the next wait.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::coroutine::{Coroutine, CoroutineState, Resumption};

//=== ScriptTimer =========================================================

/// Elapsed/timeout pair for one scheduled coroutine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptTimer {
    elapsed: f64,
    timeout: u64,
}

impl ScriptTimer {
    pub fn new(timeout: u64) -> Self {
        Self { elapsed: 0.0, timeout }
    }

    /// Accumulates `dt` milliseconds.
    ///
    /// Returns `true` when the timeout is reached, in which case the
    /// accumulator has already been reset to zero.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.timeout as f64 {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn set_timeout(&mut self, timeout: u64) {
        self.timeout = timeout;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }
}

//=== ScheduledScript =====================================================

/// A coroutine paired with the timer that paces it.
///
/// The coroutine is resumed once on construction so the first requested
/// wait is known before the first frame arrives.
pub struct ScheduledScript<R = ()> {
    coroutine: Coroutine<R>,
    timer: ScriptTimer,
}

impl<R: 'static> ScheduledScript<R> {
    /// Starts `coroutine` and schedules its first wait.
    pub fn start(mut coroutine: Coroutine<R>) -> Self {
        let first = coroutine.resume(None);
        trace!(target: "script", "Coroutine {} started: {:?}", coroutine.id(), first);

        Self {
            timer: ScriptTimer::new(first.timeout()),
            coroutine,
        }
    }

    /// Advances the timer and resumes the coroutine when it is due.
    ///
    /// Returns the outcome of the resume, or `None` if nothing fired.
    pub fn update(&mut self, dt: f64) -> Option<Resumption> {
        if self.coroutine.state().is_terminal() || !self.timer.advance(dt) {
            return None;
        }

        let outcome = self.coroutine.resume(None);
        self.timer.set_timeout(outcome.timeout());
        Some(outcome)
    }

    pub fn state(&self) -> &CoroutineState {
        self.coroutine.state()
    }

    pub fn coroutine(&self) -> &Coroutine<R> {
        &self.coroutine
    }

    pub fn timer(&self) -> &ScriptTimer {
        &self.timer
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
