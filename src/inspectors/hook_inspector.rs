//! REVM Inspector that drives the tracer hook protocol
//!
//! [`HookInspector`] translates revm's inspector callbacks into
//! [`Tracer`] hooks:
//! - `call` / `create` -> `on_call_start`
//! - `call_end` / `create_end` -> `on_call_end`
//! - `step` -> `on_instruction`
//! - `step_end` with an error result -> `on_fault`
//!
//! It keeps its own frame stack so every exit is reported with the frame it
//! closes, and it remembers the instruction that halted the root frame. The
//! executor uses that to report which undefined opcode stopped execution.
//!
//! Once the tracer's interrupt flag is set, no further hooks are dispatched;
//! the frame bookkeeping continues so the stack stays balanced.

use revm::{
    bytecode::opcode,
    context::ContextTr,
    interpreter::{
        interpreter_types::{Jumps, LoopControl},
        CallInputs, CallOutcome, CallScheme, CreateInputs, CreateOutcome, CreateScheme,
        InstructionResult, Interpreter, InterpreterResult, InterpreterTypes,
    },
    Inspector,
};
use tracing::trace;

use crate::{
    tracers::lifecycle::InterruptHandle,
    traits::Tracer,
    types::{Address, CallFrame, ExecutionFault, FrameExit, FrameKind, StepContext},
};

/// Adapter between revm's inspector interface and a [`Tracer`]
///
/// With no tracer attached it still tracks frames and the root fault, which
/// the executor needs to classify halts.
#[derive(Default)]
pub struct HookInspector<'a> {
    tracer: Option<&'a mut dyn Tracer>,
    interrupt: Option<InterruptHandle>,
    /// Open frames, root first
    frames: Vec<CallFrame>,
    /// Last instruction seen by `step`
    last_step: StepContext,
    /// First instruction fault raised by the root frame
    root_fault: Option<ExecutionFault>,
}

impl<'a> HookInspector<'a> {
    /// Creates an adapter, optionally driving `tracer`
    pub fn new(tracer: Option<&'a mut dyn Tracer>) -> Self {
        let interrupt = tracer.as_ref().map(|tracer| tracer.interrupt_handle());
        Self {
            tracer,
            interrupt,
            frames: Vec::new(),
            last_step: StepContext::default(),
            root_fault: None,
        }
    }

    /// Instruction fault that halted the root frame, if any
    pub fn root_fault(&self) -> Option<&ExecutionFault> {
        self.root_fault.as_ref()
    }

    /// Tracer to dispatch to, `None` when absent or interrupted
    fn active_tracer(&mut self) -> Option<&mut (dyn Tracer + 'a)> {
        if self
            .interrupt
            .as_ref()
            .is_some_and(InterruptHandle::is_interrupted)
        {
            return None;
        }
        self.tracer.as_deref_mut()
    }

    fn current_depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    fn enter(&mut self, frame: CallFrame) {
        trace!(depth = frame.depth, kind = ?frame.kind, "frame enter");
        if let Some(tracer) = self.active_tracer() {
            tracer.on_call_start(&frame);
        }
        self.frames.push(frame);
    }

    fn exit(&mut self, created: Option<Address>, result: &InterpreterResult) {
        let Some(mut frame) = self.frames.pop() else {
            return;
        };
        if frame.kind.is_create() {
            frame.to = created;
        }
        let exit = FrameExit {
            output: result.output.clone(),
            gas_used: result.gas.spent(),
            error: frame_fault(result, self.last_step.opcode),
        };
        trace!(depth = frame.depth, gas_used = exit.gas_used, ok = exit.error.is_none(), "frame exit");
        if let Some(tracer) = self.active_tracer() {
            tracer.on_call_end(&frame, &exit);
        }
    }
}

/// Maps an instruction result that is an error to a fault
///
/// `opcode` is the instruction that produced the result.
pub(crate) fn fault_from_instruction(result: InstructionResult, opcode: u8) -> ExecutionFault {
    match result {
        InstructionResult::OutOfGas
        | InstructionResult::MemoryOOG
        | InstructionResult::MemoryLimitOOG
        | InstructionResult::PrecompileOOG
        | InstructionResult::InvalidOperandOOG => ExecutionFault::OutOfGas,
        InstructionResult::InvalidFEOpcode => ExecutionFault::InvalidOpcode(opcode::INVALID),
        InstructionResult::OpcodeNotFound => ExecutionFault::InvalidOpcode(opcode),
        other => ExecutionFault::Halted(format!("{other:?}")),
    }
}

fn frame_fault(result: &InterpreterResult, opcode: u8) -> Option<ExecutionFault> {
    if result.result.is_ok() {
        None
    } else if result.result.is_revert() {
        Some(ExecutionFault::reverted(result.output.clone()))
    } else {
        Some(fault_from_instruction(result.result, opcode))
    }
}

impl<CTX, INTR> Inspector<CTX, INTR> for HookInspector<'_>
where
    CTX: ContextTr,
    INTR: InterpreterTypes,
{
    fn step(&mut self, interp: &mut Interpreter<INTR>, _context: &mut CTX) {
        let step = StepContext {
            pc: interp.bytecode.pc(),
            opcode: interp.bytecode.opcode(),
            depth: self.current_depth(),
        };
        self.last_step = step;
        if let Some(tracer) = self.active_tracer() {
            tracer.on_instruction(&step);
        }
    }

    fn step_end(&mut self, interp: &mut Interpreter<INTR>, _context: &mut CTX) {
        let result = interp.control.instruction_result();
        if !result.is_error() {
            return;
        }
        let step = self.last_step;
        let fault = fault_from_instruction(result, step.opcode);
        if step.depth == 0 && self.root_fault.is_none() {
            self.root_fault = Some(fault.clone());
        }
        if let Some(tracer) = self.active_tracer() {
            tracer.on_fault(&step, &fault);
        }
    }

    fn call(&mut self, context: &mut CTX, inputs: &mut CallInputs) -> Option<CallOutcome> {
        let kind = match inputs.scheme {
            CallScheme::CallCode => FrameKind::CallCode,
            CallScheme::DelegateCall => FrameKind::DelegateCall,
            CallScheme::StaticCall => FrameKind::StaticCall,
            _ => FrameKind::Call,
        };
        let frame = CallFrame {
            kind,
            from: inputs.caller,
            to: Some(inputs.target_address),
            input: inputs.input.bytes(context),
            value: inputs.call_value(),
            gas: inputs.gas_limit,
            depth: self.frames.len(),
        };
        self.enter(frame);
        None
    }

    fn call_end(&mut self, _context: &mut CTX, _inputs: &CallInputs, outcome: &mut CallOutcome) {
        self.exit(None, &outcome.result);
    }

    fn create(&mut self, _context: &mut CTX, inputs: &mut CreateInputs) -> Option<CreateOutcome> {
        let kind = match inputs.scheme {
            CreateScheme::Create2 { .. } => FrameKind::Create2,
            _ => FrameKind::Create,
        };
        let frame = CallFrame {
            kind,
            from: inputs.caller,
            to: None,
            input: inputs.init_code.clone(),
            value: inputs.value,
            gas: inputs.gas_limit,
            depth: self.frames.len(),
        };
        self.enter(frame);
        None
    }

    fn create_end(
        &mut self,
        _context: &mut CTX,
        _inputs: &CreateInputs,
        outcome: &mut CreateOutcome,
    ) {
        self.exit(outcome.address, &outcome.result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_fault_mapping() {
        assert_eq!(
            fault_from_instruction(InstructionResult::MemoryOOG, opcode::MSTORE),
            ExecutionFault::OutOfGas
        );
        assert_eq!(
            fault_from_instruction(InstructionResult::InvalidFEOpcode, 0x00),
            ExecutionFault::InvalidOpcode(0xfe)
        );
        assert_eq!(
            fault_from_instruction(InstructionResult::OpcodeNotFound, 0x0c),
            ExecutionFault::InvalidOpcode(0x0c)
        );
        assert_eq!(
            fault_from_instruction(InstructionResult::StackUnderflow, opcode::ADD),
            ExecutionFault::Halted("StackUnderflow".to_string())
        );
    }

    #[test]
    fn test_without_tracer() {
        let inspector = HookInspector::new(None);
        assert!(inspector.root_fault().is_none());
        assert_eq!(inspector.current_depth(), 0);
    }
}
