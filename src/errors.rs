//! Error types for tracing and gas estimation
//!
//! This module defines the error handling system that covers:
//! - Executor initialization errors
//! - Runtime (non-execution) errors raised by the executor
//! - Tracer construction and result extraction errors
//! - Gas estimation classification
//!
//! Execution faults (reverts, out-of-gas, invalid opcodes) are not errors here;
//! they travel as [`ExecutionFault`] values and only become an
//! [`EstimateError`] once the estimator has classified them.

use thiserror::Error;

use crate::types::ExecutionFault;

/// Top-level error type
///
/// Encompasses all possible errors that can occur during executor setup,
/// tracing and estimation, providing a unified error handling interface for users.
#[derive(Debug, Error)]
pub enum EvmError {
    /// Errors occurring during executor initialization
    #[error("Failed to initialize EVM: {0}")]
    Init(#[from] InitError),

    /// Errors occurring while running a call
    #[error("Error during execution: {0}")]
    Runtime(#[from] RuntimeError),

    /// Tracer lookup, configuration or result errors
    #[error("Tracer error: {0}")]
    Tracer(#[from] TracerError),

    /// Gas estimation failures
    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

/// Initialization-specific errors
///
/// These errors occur during the setup phase of the executor,
/// typically related to network connectivity and configuration.
#[derive(Debug, Error)]
pub enum InitError {
    /// Invalid or malformed RPC URL
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// Database setup or connection errors
    #[error("Database initialization failed: {0}")]
    Database(String),

    /// Block number retrieval errors
    #[error("Failed to get block number: {0}")]
    BlockNumber(String),
}

/// Runtime errors that are not execution faults
///
/// A revert or an out-of-gas halt is a normal outcome; these cover the
/// executor itself failing to run the call.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// General execution machinery failure
    #[error("Transaction execution failed: {0}")]
    ExecutionFailed(String),

    /// Errors accessing account information
    #[error("Account access error: {0}")]
    AccountAccess(String),
}

/// Tracer registry and tracer result errors
#[derive(Debug, Error)]
pub enum TracerError {
    /// No constructor registered under the requested name
    #[error("tracer not found: {0}")]
    NotFound(String),

    /// The tracer exists but its configuration could not be parsed
    #[error("invalid configuration for tracer {name}: {reason}")]
    InvalidConfig {
        /// Tracer name
        name: String,
        /// Parser message
        reason: String,
    },

    /// Result requested before the root frame exited
    #[error("trace result requested before the root call frame exited")]
    NotCompleted,

    /// The trace was cancelled; carries the recorded reason verbatim
    #[error("{0}")]
    Interrupted(String),

    /// Result serialization failure
    #[error("failed to serialize trace result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Classified gas estimation failures
///
/// The `Display` output of each variant is the message clients receive.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// The call does not succeed even with the whole allowance
    #[error("gas required exceeds allowance ({0})")]
    GasExceedsAllowance(u64),

    /// The call fails for a reason more gas cannot fix
    #[error("always failing transaction ({0}){}", .0.revert_detail())]
    AlwaysFailing(ExecutionFault),

    /// The transferred value exceeds the sender's balance
    #[error("insufficient funds for transfer")]
    InsufficientFunds,

    /// Pre-execution validation failure, reported as-is
    #[error("{0}")]
    Rejected(String),

    /// The executor failed to run a probe
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl EstimateError {
    /// The execution fault behind an `AlwaysFailing` classification
    pub fn fault(&self) -> Option<&ExecutionFault> {
        match self {
            EstimateError::AlwaysFailing(fault) => Some(fault),
            _ => None,
        }
    }
}
