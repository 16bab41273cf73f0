//! Tracer lifecycle and cross-thread cancellation
//!
//! A tracer moves through `Idle -> Running -> (Interrupted | Completed) -> Finalized`.
//! [`TraceLifecycle`] keeps that state for one traced call: it counts open
//! frames to detect when the root frame exits, and it owns the
//! [`InterruptHandle`] that other threads use to cancel the trace.
//!
//! Cancellation is cooperative. Setting the flag never stops the executor; it
//! makes every later hook skip its work while still returning immediately.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, OnceLock,
};

use serde::Serialize;
use tracing::warn;

use crate::errors::TracerError;

/// Externally visible lifecycle state of a tracer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TracerState {
    /// No hook has been invoked yet
    Idle,
    /// At least one frame is open
    Running,
    /// Cancellation was requested
    Interrupted,
    /// The root frame has exited
    Completed,
    /// The result has been extracted
    Finalized,
}

#[derive(Debug, Default)]
struct InterruptState {
    flag: AtomicBool,
    reason: OnceLock<String>,
}

/// Shared cancellation flag of one traced call
///
/// Cloning is cheap and every clone refers to the same flag, so a handle can be
/// moved to a watchdog thread while the executing thread keeps the tracer.
/// Reads and writes are lock-free.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle(Arc<InterruptState>);

impl InterruptHandle {
    /// Creates a fresh, unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation with a reason
    ///
    /// Safe to call from any thread, at any time, any number of times. The
    /// first reason is kept; the flag is never cleared.
    pub fn request_cancel(&self, reason: impl Into<String>) {
        let reason = reason.into();
        if self.0.reason.set(reason).is_ok() {
            warn!(reason = self.reason().unwrap_or_default(), "trace cancellation requested");
        }
        self.0.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.0.flag.load(Ordering::Acquire)
    }

    /// The recorded cancellation reason, if any
    pub fn reason(&self) -> Option<&str> {
        self.0.reason.get().map(String::as_str)
    }
}

/// Frame bookkeeping and state machine for one traced call
#[derive(Debug, Default)]
pub struct TraceLifecycle {
    interrupt: InterruptHandle,
    open_frames: usize,
    started: bool,
    root_exited: bool,
    finalized: bool,
}

impl TraceLifecycle {
    /// Creates an idle lifecycle with its own interrupt flag
    pub fn new() -> Self {
        Self::default()
    }

    /// The interrupt handle shared with cancelling threads
    pub fn interrupt_handle(&self) -> &InterruptHandle {
        &self.interrupt
    }

    /// Whether hooks must skip their work
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.is_interrupted()
    }

    /// Records a frame entry
    ///
    /// Returns `false` if the trace is interrupted, in which case the caller
    /// must not touch its observations.
    pub fn enter_frame(&mut self) -> bool {
        if self.is_interrupted() {
            return false;
        }
        self.started = true;
        self.open_frames += 1;
        true
    }

    /// Records a frame exit; see [`Self::enter_frame`] for the return value
    pub fn exit_frame(&mut self) -> bool {
        if self.is_interrupted() {
            return false;
        }
        self.open_frames = self.open_frames.saturating_sub(1);
        if self.started && self.open_frames == 0 {
            self.root_exited = true;
        }
        true
    }

    /// Current lifecycle state
    pub fn state(&self) -> TracerState {
        if self.finalized {
            TracerState::Finalized
        } else if self.is_interrupted() {
            TracerState::Interrupted
        } else if self.root_exited {
            TracerState::Completed
        } else if self.started {
            TracerState::Running
        } else {
            TracerState::Idle
        }
    }

    /// Gate for result extraction
    ///
    /// # Returns
    /// * `Ok(())` - the root frame exited; the caller may build its payload
    /// * `Err(TracerError::Interrupted)` - cancellation was requested; carries the reason
    /// * `Err(TracerError::NotCompleted)` - called while idle or still running
    pub fn finalize(&mut self) -> Result<(), TracerError> {
        if self.is_interrupted() {
            self.finalized = true;
            let reason = self.interrupt.reason().unwrap_or_default().to_string();
            return Err(TracerError::Interrupted(reason));
        }
        match self.state() {
            TracerState::Completed | TracerState::Finalized => {
                self.finalized = true;
                Ok(())
            }
            _ => Err(TracerError::NotCompleted),
        }
    }
}
