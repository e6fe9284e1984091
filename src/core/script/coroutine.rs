//=========================================================================
// Coroutine
//=========================================================================
//
// Cooperative, suspendable execution context for a demo script.
//
// Architecture:
// ```text
//   resume(value) ──► poll(body) ──► Yielder::wait(ms).await ──► Pending
//        ▲                                                         │
//        └──────────── Resumption::Suspended(ms) ◄─────────────────┘
// ```
//
// A script body is an `async` block. The only thing it may await is its
// own `Yielder`; every await records the requested wait and parks the
// body. `resume` polls the body exactly once with a no-op waker, so the
// body runs synchronously until its next yield or until it returns.
//
// Panics raised inside the body are caught and turned into a terminal
// `Failed` state; they never unwind into the frame loop. The process
// panic hook still runs before the catch, so hosts that want the message
// in the log stream install a hook that forwards to `log` (the demo
// binary does).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll, Waker};

use log::{debug, error, trace};
use thiserror::Error;

//=== Constants ===========================================================

/// Wait reported for finished coroutines. Large enough that no frame
/// loop will ever accumulate it.
pub const NEVER: u64 = u64::MAX;

//=== ScriptError =========================================================

/// Reasons a script body ends in the `Failed` state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// The body returned an error of its own.
    #[error("script aborted: {0}")]
    Aborted(String),

    /// The body panicked while running.
    #[error("script panicked: {0}")]
    Panicked(String),

    /// The body awaited something other than its yielder.
    #[error("script suspended without requesting a wait")]
    Stalled,
}

/// Result type returned by script bodies.
pub type ScriptResult = Result<(), ScriptError>;

//=== CoroutineId =========================================================

/// Process-unique coroutine identity, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoroutineId(u64);

impl CoroutineId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CoroutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "co#{}", self.0)
    }
}

//=== CoroutineState ======================================================

/// Lifecycle state of a [`Coroutine`].
///
/// ```text
/// NotStarted ──resume──► Running ──yield──► Suspended ──resume──► Running
///                           │
///                           ├──return Ok──► Completed
///                           └──error/panic──► Failed
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoroutineState {
    NotStarted,
    Running,
    Suspended,
    Completed,
    Failed(ScriptError),
}

impl CoroutineState {
    /// Returns `true` for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }
}

//=== Resumption ==========================================================

/// Outcome of a single [`Coroutine::resume`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resumption {
    /// The body yielded and asks to be resumed after this many milliseconds.
    Suspended(u64),

    /// The body returned normally.
    Completed,

    /// The body failed; the coroutine is now terminal.
    Failed(ScriptError),
}

impl Resumption {
    /// Wait to schedule before the next resume ([`NEVER`] once finished).
    pub fn timeout(&self) -> u64 {
        match self {
            Self::Suspended(ms) => *ms,
            Self::Completed | Self::Failed(_) => NEVER,
        }
    }
}

//=== Exchange ============================================================

// State shared between a coroutine and the yielder it hands to its body.
struct Exchange<R> {
    requested: Option<u64>,
    payload: Option<R>,
}

//=== Yielder =============================================================

/// Suspension handle passed to a script body.
///
/// ```rust
/// # use aetheric_demos::core::script::{Coroutine, Resumption};
/// let mut co = Coroutine::<()>::new(|yielder, _| async move {
///     yielder.wait(1000).await;
///     Ok(())
/// });
/// assert_eq!(co.resume(None), Resumption::Suspended(1000));
/// assert_eq!(co.resume(None), Resumption::Completed);
/// ```
pub struct Yielder<R> {
    exchange: Rc<RefCell<Exchange<R>>>,
}

impl<R> Yielder<R> {
    /// Suspends the body for `ms` milliseconds.
    ///
    /// Resolves to the value passed to the `resume` that wakes the body.
    pub fn wait(&self, ms: u64) -> Suspend<R> {
        Suspend {
            exchange: Rc::clone(&self.exchange),
            ms,
            parked: false,
        }
    }
}

/// Future returned by [`Yielder::wait`].
pub struct Suspend<R> {
    exchange: Rc<RefCell<Exchange<R>>>,
    ms: u64,
    parked: bool,
}

impl<R> Future for Suspend<R> {
    type Output = Option<R>;

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.parked {
            return Poll::Ready(self.exchange.borrow_mut().payload.take());
        }

        self.parked = true;
        self.exchange.borrow_mut().requested = Some(self.ms);
        Poll::Pending
    }
}

//=== Coroutine ===========================================================

type ScriptFuture = Pin<Box<dyn Future<Output = ScriptResult>>>;
type ScriptStart<R> = Box<dyn FnOnce(Yielder<R>, Option<R>) -> ScriptFuture>;

enum Body<R> {
    Pending(ScriptStart<R>),
    Started(ScriptFuture),
    Finished,
}

/// A script body that can be suspended and resumed from a frame loop.
///
/// `R` is the type of the optional value handed over on each resume.
pub struct Coroutine<R = ()> {
    id: CoroutineId,
    state: CoroutineState,
    body: Body<R>,
    exchange: Rc<RefCell<Exchange<R>>>,
    resumes: u64,
}

impl<R: 'static> Coroutine<R> {
    //--- Construction -----------------------------------------------------

    /// Creates a coroutine in the `NotStarted` state.
    ///
    /// `body` is not called until the first [`resume`](Self::resume); it
    /// receives the yielder and the first resume value.
    pub fn new<F, Fut>(body: F) -> Self
    where
        F: FnOnce(Yielder<R>, Option<R>) -> Fut + 'static,
        Fut: Future<Output = ScriptResult> + 'static,
    {
        let id = CoroutineId::next();
        trace!(target: "script", "Created coroutine {}", id);

        Self {
            id,
            state: CoroutineState::NotStarted,
            body: Body::Pending(Box::new(move |yielder, value| {
                Box::pin(body(yielder, value)) as ScriptFuture
            })),
            exchange: Rc::new(RefCell::new(Exchange {
                requested: None,
                payload: None,
            })),
            resumes: 0,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn id(&self) -> CoroutineId {
        self.id
    }

    pub fn state(&self) -> &CoroutineState {
        &self.state
    }

    /// Number of resumes that actually ran the body.
    pub fn resumes(&self) -> u64 {
        self.resumes
    }

    //--- Resume -----------------------------------------------------------

    /// Runs the body until it yields or finishes.
    ///
    /// Resuming a finished coroutine does nothing and reports the same
    /// terminal outcome again, whose [`Resumption::timeout`] is [`NEVER`].
    pub fn resume(&mut self, value: Option<R>) -> Resumption {
        let future = match std::mem::replace(&mut self.body, Body::Finished) {
            Body::Pending(start) => {
                let yielder = Yielder {
                    exchange: Rc::clone(&self.exchange),
                };
                match catch_unwind(AssertUnwindSafe(move || start(yielder, value))) {
                    Ok(future) => future,
                    Err(panic) => return self.fail(ScriptError::Panicked(panic_message(panic))),
                }
            }
            Body::Started(future) => {
                self.exchange.borrow_mut().payload = value;
                future
            }
            Body::Finished => return self.terminal_outcome(),
        };

        self.state = CoroutineState::Running;
        self.resumes += 1;
        self.poll_body(future)
    }

    //--- Internal Helpers -------------------------------------------------

    fn poll_body(&mut self, mut future: ScriptFuture) -> Resumption {
        let mut cx = Context::from_waker(Waker::noop());
        let polled = catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx)));

        match polled {
            Ok(Poll::Pending) => match self.take_requested() {
                Some(ms) => {
                    self.state = CoroutineState::Suspended;
                    self.body = Body::Started(future);
                    Resumption::Suspended(ms)
                }
                None => self.fail(ScriptError::Stalled),
            },
            Ok(Poll::Ready(Ok(()))) => {
                debug!(target: "script", "Coroutine {} completed after {} resumes", self.id, self.resumes);
                self.state = CoroutineState::Completed;
                Resumption::Completed
            }
            Ok(Poll::Ready(Err(e))) => self.fail(e),
            Err(panic) => self.fail(ScriptError::Panicked(panic_message(panic))),
        }
    }

    fn take_requested(&self) -> Option<u64> {
        self.exchange.borrow_mut().requested.take()
    }

    fn fail(&mut self, e: ScriptError) -> Resumption {
        error!(target: "script", "Coroutine {} failed: {}", self.id, e);
        self.body = Body::Finished;
        self.state = CoroutineState::Failed(e.clone());
        Resumption::Failed(e)
    }

    fn terminal_outcome(&self) -> Resumption {
        match &self.state {
            CoroutineState::Failed(e) => Resumption::Failed(e.clone()),
            _ => Resumption::Completed,
        }
    }
}

impl<R> fmt::Debug for Coroutine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coroutine")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("resumes", &self.resumes)
            .finish()
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::pending;

    //--- Lifecycle --------------------------------------------------------

    #[test]
    fn new_coroutine_is_not_started() {
        let co = Coroutine::<()>::new(|_, _| async { Ok(()) });
        assert_eq!(*co.state(), CoroutineState::NotStarted);
        assert_eq!(co.resumes(), 0);
    }

    #[test]
    fn body_is_not_run_before_first_resume() {
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        let mut co = Coroutine::<()>::new(move |_, _| async move {
            *flag.borrow_mut() = true;
            Ok(())
        });

        assert!(!*ran.borrow());
        co.resume(None);
        assert!(*ran.borrow());
    }

    #[test]
    fn yields_report_requested_waits_in_order() {
        let mut co = Coroutine::<()>::new(|y, _| async move {
            y.wait(1000).await;
            y.wait(1500).await;
            y.wait(0).await;
            Ok(())
        });

        assert_eq!(co.resume(None), Resumption::Suspended(1000));
        assert_eq!(*co.state(), CoroutineState::Suspended);
        assert_eq!(co.resume(None), Resumption::Suspended(1500));
        assert_eq!(co.resume(None), Resumption::Suspended(0));
        assert_eq!(co.resume(None), Resumption::Completed);
        assert_eq!(*co.state(), CoroutineState::Completed);
        assert_eq!(co.resumes(), 4);
    }

    #[test]
    fn execution_continues_where_it_left_off() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let out = Rc::clone(&log);
        let mut co = Coroutine::<()>::new(move |y, _| async move {
            out.borrow_mut().push("load");
            y.wait(10).await;
            out.borrow_mut().push("play");
            y.wait(10).await;
            out.borrow_mut().push("stop");
            Ok(())
        });

        co.resume(None);
        assert_eq!(*log.borrow(), vec!["load"]);
        co.resume(None);
        assert_eq!(*log.borrow(), vec!["load", "play"]);
        co.resume(None);
        assert_eq!(*log.borrow(), vec!["load", "play", "stop"]);
    }

    //--- Resume Values ----------------------------------------------------

    #[test]
    fn resume_values_reach_the_body() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let out = Rc::clone(&seen);
        let mut co = Coroutine::<u32>::new(move |y, first| async move {
            out.borrow_mut().push(first);
            let second = y.wait(5).await;
            out.borrow_mut().push(second);
            let third = y.wait(5).await;
            out.borrow_mut().push(third);
            Ok(())
        });

        co.resume(Some(1));
        co.resume(Some(2));
        co.resume(None);
        assert_eq!(*seen.borrow(), vec![Some(1), Some(2), None]);
    }

    //--- Terminal States --------------------------------------------------

    #[test]
    fn resume_after_completion_is_a_noop_with_infinite_wait() {
        let mut co = Coroutine::<()>::new(|_, _| async { Ok(()) });
        assert_eq!(co.resume(None), Resumption::Completed);

        let again = co.resume(None);
        assert_eq!(again, Resumption::Completed);
        assert_eq!(again.timeout(), NEVER);
        assert_eq!(co.resumes(), 1);
    }

    #[test]
    fn error_before_first_yield_fails_immediately() {
        let mut co = Coroutine::<()>::new(|_, _| async {
            Err(ScriptError::Aborted("missing asset".into()))
        });

        let outcome = co.resume(None);
        assert_eq!(outcome, Resumption::Failed(ScriptError::Aborted("missing asset".into())));
        assert_eq!(outcome.timeout(), NEVER);
        assert!(co.state().is_terminal());
    }

    #[test]
    fn panic_in_body_is_captured_as_failure() {
        let mut co = Coroutine::<()>::new(|y, _| async move {
            y.wait(1).await;
            panic!("boom");
        });

        assert_eq!(co.resume(None), Resumption::Suspended(1));
        assert_eq!(co.resume(None), Resumption::Failed(ScriptError::Panicked("boom".into())));
        assert_eq!(*co.state(), CoroutineState::Failed(ScriptError::Panicked("boom".into())));

        // Still terminal, still harmless.
        assert_eq!(co.resume(None).timeout(), NEVER);
        assert_eq!(co.resumes(), 2);
    }

    #[test]
    fn awaiting_a_foreign_future_is_a_stall() {
        let mut co = Coroutine::<()>::new(|_, _| async {
            pending::<()>().await;
            Ok(())
        });

        assert_eq!(co.resume(None), Resumption::Failed(ScriptError::Stalled));
    }

    async fn spin(y: Yielder<()>) -> ScriptResult {
        loop {
            y.wait(3000).await;
            y.wait(0).await;
        }
    }

    #[test]
    fn unbounded_loop_never_completes() {
        let mut co = Coroutine::<()>::new(|y, _| spin(y));

        for _ in 0..1000 {
            assert!(matches!(co.resume(None), Resumption::Suspended(_)));
        }
        assert_eq!(*co.state(), CoroutineState::Suspended);
    }

    #[test]
    fn ids_are_unique() {
        let a = Coroutine::<()>::new(|_, _| async { Ok(()) });
        let b = Coroutine::<()>::new(|_, _| async { Ok(()) });
        assert_ne!(a.id(), b.id());
    }
}
