//! Core types for EVM tracing and gas estimation
//!
//! This module defines the data structures shared by the tracer hook protocol,
//! the executor and the gas estimator:
//! - Call frames and their exit data
//! - Per-instruction step context
//! - Execution faults and outcomes
//! - Call requests (the `eth_estimateGas`-shaped input)

use std::fmt;

pub use alloy::primitives::{Address, Bytes, TxKind, U256};
use serde::{Deserialize, Serialize};

use crate::utils::error_utils::{decode_revert_reason, revert_data_hex};

/// Kind of a call frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameKind {
    /// Ordinary message call
    Call,
    /// Legacy CALLCODE
    CallCode,
    /// DELEGATECALL, executes target code in the caller's context
    DelegateCall,
    /// STATICCALL, state modifications are forbidden
    StaticCall,
    /// Contract creation via CREATE (or a creation transaction)
    Create,
    /// Contract creation via CREATE2
    Create2,
}

impl FrameKind {
    /// Whether this frame deploys a contract
    pub fn is_create(&self) -> bool {
        matches!(self, FrameKind::Create | FrameKind::Create2)
    }
}

/// One invocation of code inside the virtual machine
///
/// Frames follow strict stack discipline: a frame is opened by the executor,
/// may open children, and is closed before its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallFrame {
    /// Kind of invocation
    pub kind: FrameKind,
    /// Sender of the message
    pub from: Address,
    /// Target account. For creations this is `None` on entry and set to the
    /// deployed address (when known) on exit.
    pub to: Option<Address>,
    /// Call data, or init code for creations
    pub input: Bytes,
    /// Native value transferred
    pub value: U256,
    /// Gas made available to the frame
    pub gas: u64,
    /// Nesting level, root = 0
    pub depth: usize,
}

/// Data attached to a frame when it exits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameExit {
    /// Return data or revert payload
    pub output: Bytes,
    /// Gas spent by the frame
    pub gas_used: u64,
    /// Reported failure, `None` on success
    pub error: Option<ExecutionFault>,
}

/// Interpreter position handed to per-instruction hooks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepContext {
    /// Program counter within the executing code
    pub pc: usize,
    /// Opcode about to execute (or that just faulted)
    pub opcode: u8,
    /// Depth of the frame executing the instruction
    pub depth: usize,
}

/// Structured failure of an execution
///
/// Faults are data: they are threaded through outcomes and frame exits and
/// never raised as process errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExecutionFault {
    /// Execution ran out of gas
    OutOfGas,
    /// Gas limit below the intrinsic cost of the transaction
    IntrinsicGas,
    /// Explicit REVERT
    Reverted {
        /// Raw revert payload
        data: Bytes,
        /// Decoded `Error(string)` / `Panic(uint256)` reason, if any
        reason: Option<String>,
    },
    /// Undefined opcode or the designated INVALID (0xfe)
    InvalidOpcode(u8),
    /// Any other exceptional halt (stack underflow, bad jump, ...)
    Halted(String),
    /// Transaction rejected before execution (nonce, funds, ...)
    Rejected(String),
}

impl ExecutionFault {
    /// Builds a revert fault, decoding the reason from `data`
    pub fn reverted(data: Bytes) -> Self {
        let reason = decode_revert_reason(&data);
        ExecutionFault::Reverted { data, reason }
    }

    /// Whether supplying more gas could turn this failure into a success
    pub fn is_gas_related(&self) -> bool {
        matches!(self, ExecutionFault::OutOfGas | ExecutionFault::IntrinsicGas)
    }

    /// Parenthesised detail appended after the fault in estimation errors:
    /// the decoded revert reason, else the revert data in hex, else nothing.
    pub fn revert_detail(&self) -> String {
        match self {
            ExecutionFault::Reverted {
                reason: Some(reason),
                ..
            } => format!(" ({reason})"),
            ExecutionFault::Reverted { data, reason: None } if !data.is_empty() => {
                format!(" ({})", revert_data_hex(data))
            }
            _ => String::new(),
        }
    }
}

impl fmt::Display for ExecutionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionFault::OutOfGas => write!(f, "out of gas"),
            ExecutionFault::IntrinsicGas => write!(f, "intrinsic gas too low"),
            ExecutionFault::Reverted { .. } => write!(f, "execution reverted"),
            ExecutionFault::InvalidOpcode(op) => {
                write!(f, "invalid opcode: opcode {op:#x} not defined")
            }
            ExecutionFault::Halted(reason) => write!(f, "{reason}"),
            ExecutionFault::Rejected(reason) => write!(f, "{reason}"),
        }
    }
}

/// Result of running one call through an executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    /// Gas consumed by the transaction (after refunds)
    pub gas_used: u64,
    /// Return data, or revert payload on revert
    pub return_data: Bytes,
    /// Failure, `None` on success
    pub error: Option<ExecutionFault>,
}

impl ExecutionOutcome {
    /// Check if the execution succeeded
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Call description submitted for simulation or gas estimation
///
/// Deserializes from the familiar `{from, to?, gas?, gasPrice?, value?, data?}`
/// request object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallRequest {
    /// Transaction sender
    pub from: Address,
    /// Target, `None` for contract creation
    pub to: Option<Address>,
    /// Caller-supplied gas cap
    pub gas: Option<u64>,
    /// Gas price; when non-zero the sender's balance bounds the gas
    pub gas_price: Option<u128>,
    /// Native value to send
    pub value: U256,
    /// Call data or init code
    #[serde(alias = "input")]
    pub data: Bytes,
}

impl CallRequest {
    /// Transaction target as a [`TxKind`]
    pub fn kind(&self) -> TxKind {
        match self.to {
            Some(to) => TxKind::Call(to),
            None => TxKind::Create,
        }
    }

    /// A call with no input to an explicit target
    pub fn is_plain_transfer(&self) -> bool {
        self.to.is_some() && self.data.is_empty()
    }
}
