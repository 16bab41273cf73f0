//! # REVM Probe
//!
//! Pluggable execution tracers and a binary-search gas estimator on top of REVM.
//!
//! ## Core Features
//!
//! - **Tracer Hook Protocol**
//!   - Frame entry / exit, per-instruction and fault hooks
//!   - Cross-thread, cooperative cancellation with a reason
//!   - Tracers built by name from JSON configuration
//!
//! - **Contract Tracer**
//!   - Records every contract created during a call
//!   - Optional filtering by an instruction the init code must contain
//!
//! - **Gas Estimation**
//!   - Minimal successful gas limit via binary search
//!   - Classified failures: out of gas at the cap, reverts with decoded
//!     reasons, invalid opcodes, insufficient funds
//!
//! ## Features
//!
//! - `rustls-tls`: Uses rustls as the TLS implementation instead of native-tls (OpenSSL).
//!   This is useful for environments where OpenSSL is not available or not desired.
//!
//!   Usage example:
//!   ```toml
//!   [dependencies]
//!   revm-probe = { version = "0.3.0", default-features = false, features = ["rustls-tls"] }
//!   ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use revm_probe::{
//!     create_evm_from_rpc,
//!     types::CallRequest,
//! };
//! use alloy::primitives::{address, U256};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut evm = create_evm_from_rpc("https://eth.llamarpc.com", None).await?;
//!
//! let call = CallRequest {
//!     from: address!("C255fC198eEdAC7AF8aF0f6e0ca781794B094A61"),
//!     to: Some(address!("d878229c9c3575F224784DE610911B5607a3ad15")),
//!     value: U256::from(120000000000000000u64), // 0.12 ETH
//!     ..Default::default()
//! };
//!
//! // Minimal gas limit for the call
//! match evm.estimate_gas(&call) {
//!     Ok(gas) => println!("gas: {gas}"),
//!     Err(e) => println!("estimation failed: {e}"),
//! }
//!
//! // Contracts deployed by the call, with their init code
//! let created = evm.trace_call_by_name(
//!     "contractTracer",
//!     br#"{"opCode":"CREATE2","withByteCode":true}"#,
//!     &call,
//! )?;
//! println!("{created}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `evm`: REVM-backed executor and its constructors
//! - `estimator`: binary-search gas estimation over any executor
//! - `tracers`: tracer lifecycle, the contract tracer and the tracer registry
//! - `inspectors`: adapter from REVM inspector callbacks to tracer hooks
//! - `types`: Core data structures and type definitions
//! - `traits`: Trait definitions for extensibility
//! - `errors`: Error types and handling
//! - `utils`: Helper functions and utilities

pub mod errors;
pub mod estimator;
pub mod evm;
pub mod inspectors;
pub mod tracers;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export only the essential types and functions
pub use errors::{EstimateError, EvmError, TracerError};
pub use estimator::{EstimatorConfig, GasEstimator};
pub use evm::{
    builder::{create_evm, create_evm_from_rpc, create_evm_with_db},
    TraceEvm,
};
pub use tracers::{construct_tracer, ContractTracer, InterruptHandle, TracerState};
pub use traits::{Executor, TraceOutput, Tracer};
pub use types::{CallRequest, ExecutionFault, ExecutionOutcome};
