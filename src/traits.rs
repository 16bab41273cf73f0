//! Core traits for tracer hooks and call execution
//!
//! This module provides the seams between the three parts of the crate:
//! - [`Tracer`]: the hook protocol an executor drives while a call runs
//! - [`TraceOutput`]: typed access to a tracer's collected data
//! - [`Executor`]: "run this call with this gas limit", as consumed by the
//!   gas estimator

use serde_json::Value;

use crate::{
    errors::{RuntimeError, TracerError},
    tracers::lifecycle::{InterruptHandle, TracerState},
    types::{Address, CallFrame, CallRequest, ExecutionFault, ExecutionOutcome, FrameExit, StepContext, U256},
};

/// Hook protocol between an executor and an observer
///
/// The executor invokes the hooks on a single thread, in program order, with
/// strict frame discipline: every `on_call_start` is matched by exactly one
/// `on_call_end` and nested frames close before their parent.
///
/// Cancellation may be requested from any other thread through
/// [`Tracer::interrupt_handle`]. After that, hooks must return without
/// touching any observation. The executor is not stopped.
///
/// A tracer observes a single call; construct a fresh one per trace.
pub trait Tracer: Send {
    /// A frame is entered
    fn on_call_start(&mut self, frame: &CallFrame);

    /// A frame exits; `frame` is the same frame passed to `on_call_start`,
    /// with `to` filled in for creations
    fn on_call_end(&mut self, frame: &CallFrame, exit: &FrameExit);

    /// An instruction is about to execute
    fn on_instruction(&mut self, _step: &StepContext) {}

    /// An instruction faulted
    fn on_fault(&mut self, _step: &StepContext, _fault: &ExecutionFault) {}

    /// Shared cancellation flag, cloneable into other threads
    fn interrupt_handle(&self) -> InterruptHandle;

    /// Requests cancellation with a human-readable reason
    fn request_cancel(&self, reason: &str) {
        self.interrupt_handle().request_cancel(reason);
    }

    /// Current lifecycle state
    fn state(&self) -> TracerState;

    /// Produces the JSON payload of a completed trace
    ///
    /// # Returns
    /// * `Ok(Value)` - the tracer's payload
    /// * `Err(TracerError::Interrupted)` - the trace was cancelled; carries the reason
    /// * `Err(TracerError::NotCompleted)` - the root frame has not exited yet
    fn extract_result(&mut self) -> Result<Value, TracerError>;
}

/// Typed view of the data a tracer collected
pub trait TraceOutput {
    /// Type of output data produced by the tracer
    type Output;

    /// Returns the collected data without consuming the tracer
    fn get_output(&self) -> Self::Output;
}

/// Something that can run a call against a state snapshot
///
/// Each `run` starts from the same state: whatever a previous run changed is
/// discarded. Execution faults are returned inside [`ExecutionOutcome`];
/// `Err` is reserved for the executor itself failing (database access, ...).
pub trait Executor {
    /// Runs `call` with the given gas limit, optionally driving a tracer
    fn run(
        &mut self,
        call: &CallRequest,
        gas_limit: u64,
        tracer: Option<&mut dyn Tracer>,
    ) -> Result<ExecutionOutcome, RuntimeError>;

    /// Native balance of `address` in the snapshot
    fn balance(&mut self, address: Address) -> Result<U256, RuntimeError>;

    /// Largest gas limit a single call may use
    fn gas_ceiling(&self) -> u64;
}
