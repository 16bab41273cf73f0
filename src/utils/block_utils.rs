//! Block environment utilities for EVM simulation
//!
//! The block gas limit doubles as the gas-estimation ceiling, so block
//! environments built here always carry an explicit limit.

use revm::context::BlockEnv;

/// Gas limit used when the caller does not supply one.
pub const DEFAULT_BLOCK_GAS_LIMIT: u64 = 30_000_000;

/// Create a block environment for EVM execution
///
/// # Arguments
/// - `block_number`: Block number for simulation
/// - `block_timestamp`: Block timestamp (Unix time)
/// - `block_gas_limit`: Optional gas limit ([`DEFAULT_BLOCK_GAS_LIMIT`] if None)
///
/// # Example
/// ```rust
/// # use revm_probe::utils::block_utils::create_block_env;
/// let block = create_block_env(18_000_000, 1672531200, Some(10_000_000));
/// assert_eq!(block.gas_limit, 10_000_000);
/// ```
pub fn create_block_env(
    block_number: u64,
    block_timestamp: u64,
    block_gas_limit: Option<u64>,
) -> BlockEnv {
    BlockEnv {
        number: block_number,
        timestamp: block_timestamp,
        gas_limit: block_gas_limit.unwrap_or(DEFAULT_BLOCK_GAS_LIMIT),
        ..Default::default()
    }
}
