//! Utility modules used by the tracers and the gas estimator
//!
//! - [`bytecode_utils`]: opcode scanning that steps over push operands,
//!   mnemonic lookup
//! - [`error_utils`]: revert reason decoding (`Error(string)`, `Panic(uint256)`)
//! - [`block_utils`]: block environment construction

/// Bytecode scanning and opcode name lookup
pub mod bytecode_utils;

/// Revert payload decoding
pub mod error_utils;

/// Block environment helpers
pub mod block_utils;
