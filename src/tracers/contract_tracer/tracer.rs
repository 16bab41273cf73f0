//! Hook implementation for ContractTracer
//!
//! Only frame hooks do work: a creation frame is matched against the filter on
//! entry and, if it deployed to an address, recorded on exit. Instruction and
//! fault hooks keep the default no-op.

use serde_json::Value;
use tracing::trace;

use crate::{
    errors::TracerError,
    tracers::{
        contract_tracer::ContractTracer,
        lifecycle::{InterruptHandle, TracerState},
    },
    traits::{TraceOutput, Tracer},
    types::{CallFrame, FrameExit},
};

impl Tracer for ContractTracer {
    fn on_call_start(&mut self, frame: &CallFrame) {
        if !self.lifecycle.enter_frame() {
            return;
        }
        let observation = if frame.kind.is_create() {
            self.observe(&frame.input)
        } else {
            None
        };
        self.pending.push(observation);
    }

    fn on_call_end(&mut self, frame: &CallFrame, _exit: &FrameExit) {
        if !self.lifecycle.exit_frame() {
            return;
        }
        let Some(Some(observation)) = self.pending.pop() else {
            return;
        };
        if let Some(address) = frame.to {
            trace!(%address, depth = frame.depth, "contract creation recorded");
            self.created.insert(address, observation);
        }
    }

    fn interrupt_handle(&self) -> InterruptHandle {
        self.lifecycle.interrupt_handle().clone()
    }

    fn state(&self) -> TracerState {
        self.lifecycle.state()
    }

    fn extract_result(&mut self) -> Result<Value, TracerError> {
        self.lifecycle.finalize()?;
        Ok(serde_json::to_value(self.get_output())?)
    }
}
