//! Call execution for TraceEvm
//!
//! This module implements [`Executor`] for [`TraceEvm`] and the convenience
//! entry points built on it:
//! - tracing a call with a tracer instance or a registered tracer name
//! - gas estimation
//! - committed transactions and contract deployment
//!
//! revm's results are folded into [`ExecutionOutcome`]: halts, reverts and
//! transaction validation failures become [`ExecutionFault`] values; only
//! database failures surface as errors.

use revm::{
    context::{CfgEnv, Context, TxEnv},
    context_interface::result::{EVMError, ExecutionResult, HaltReason, InvalidTransaction},
    database::{CacheDB, DatabaseCommit, DatabaseRef},
    handler::{MainBuilder, MainContext},
    ExecuteEvm, InspectEvm,
};
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    errors::{EstimateError, EvmError, RuntimeError},
    estimator::GasEstimator,
    evm::TraceEvm,
    inspectors::HookInspector,
    tracers::construct_tracer,
    traits::{Executor, Tracer},
    types::{Address, Bytes, CallRequest, ExecutionFault, ExecutionOutcome, U256},
};

impl<DB> TraceEvm<DB>
where
    DB: DatabaseRef,
{
    /// Nonce of `address` in the snapshot
    fn nonce_of(&self, address: Address) -> Result<u64, RuntimeError> {
        Ok(self
            .db
            .basic_ref(address)
            .map_err(|e| RuntimeError::AccountAccess(format!("Failed to get account info: {}", e)))?
            .map(|acc| acc.nonce)
            .unwrap_or_default())
    }

    /// Build the transaction environment for `call`
    fn build_tx(&self, call: &CallRequest, gas_limit: u64) -> Result<TxEnv, RuntimeError> {
        let nonce = self.nonce_of(call.from)?;
        Ok(TxEnv::builder()
            .caller(call.from)
            .kind(call.kind())
            .value(call.value)
            .data(call.data.clone())
            .gas_limit(gas_limit)
            .gas_price(call.gas_price.unwrap_or_default())
            .nonce(nonce)
            .build_fill())
    }

    /// Execute `call` and write its state changes into the snapshot
    ///
    /// Failed transactions still consume the sender's nonce and gas, as they
    /// would on chain. Rejected transactions change nothing.
    pub fn transact_commit(
        &mut self,
        call: &CallRequest,
        gas_limit: u64,
    ) -> Result<ExecutionOutcome, RuntimeError> {
        let tx = self.build_tx(call, gas_limit)?;
        let result = {
            let mut ctx = Context::mainnet().with_db(CacheDB::new(&self.db));
            configure_cfg(&mut ctx.cfg);
            let mut evm = ctx.build_mainnet();
            evm.set_block(self.block.clone());
            evm.transact(tx)
        };
        match result {
            Ok(result_and_state) => {
                self.db.commit(result_and_state.state);
                Ok(outcome_from_result(result_and_state.result, None))
            }
            Err(EVMError::Transaction(err)) => Ok(rejected_outcome(err)),
            Err(e) => Err(RuntimeError::ExecutionFailed(e.to_string())),
        }
    }

    /// Deploy `init_code` from `from` and return the new contract's address
    pub fn deploy(&mut self, from: Address, init_code: Bytes) -> Result<Address, RuntimeError> {
        let address = from.create(self.nonce_of(from)?);
        let call = CallRequest {
            from,
            data: init_code,
            ..Default::default()
        };
        let outcome = self.transact_commit(&call, self.block.gas_limit)?;
        match outcome.error {
            None => {
                debug!(%address, gas_used = outcome.gas_used, "contract deployed");
                Ok(address)
            }
            Some(fault) => Err(RuntimeError::ExecutionFailed(format!(
                "deployment failed: {fault}{}",
                fault.revert_detail()
            ))),
        }
    }

    /// Run `call` while driving `tracer`
    ///
    /// Uses the call's own gas limit, or the block gas limit if it has none.
    pub fn trace_call(
        &mut self,
        call: &CallRequest,
        tracer: &mut dyn Tracer,
    ) -> Result<ExecutionOutcome, RuntimeError> {
        let gas_limit = self.call_gas_limit(call);
        self.run(call, gas_limit, Some(tracer))
    }

    /// Run `call` under the registered tracer `name` and return its payload
    ///
    /// A transaction rejected before execution is reported as
    /// [`RuntimeError::ExecutionFailed`] carrying the rejection message.
    ///
    /// # Example
    /// ```
    /// use revm_probe::{create_evm, types::{Address, Bytes, CallRequest}};
    ///
    /// let mut evm = create_evm();
    /// // Deploy a contract whose runtime code is a single STOP
    /// let call = CallRequest {
    ///     from: Address::with_last_byte(0x01),
    ///     data: Bytes::from_static(&[0x60, 0x01, 0x60, 0x00, 0xf3]),
    ///     ..Default::default()
    /// };
    /// let result = evm.trace_call_by_name("contractTracer", b"", &call).unwrap();
    /// assert_eq!(result.as_object().map(|m| m.len()), Some(1));
    /// ```
    pub fn trace_call_by_name(
        &mut self,
        name: &str,
        config: &[u8],
        call: &CallRequest,
    ) -> Result<Value, EvmError> {
        let mut tracer = construct_tracer(name, config)?;
        let outcome = self.trace_call(call, tracer.as_mut())?;
        // A rejected transaction never enters a frame, so the tracer has nothing to report
        match outcome.error {
            Some(fault @ (ExecutionFault::Rejected(_) | ExecutionFault::IntrinsicGas)) => {
                Err(RuntimeError::ExecutionFailed(fault.to_string()).into())
            }
            _ => Ok(tracer.extract_result()?),
        }
    }

    /// Estimate the minimum gas limit `call` needs, with default settings
    pub fn estimate_gas(&mut self, call: &CallRequest) -> Result<u64, EstimateError> {
        GasEstimator::default().estimate(self, call)
    }

    fn call_gas_limit(&self, call: &CallRequest) -> u64 {
        match call.gas {
            Some(gas) if gas > 0 => gas,
            _ => self.block.gas_limit,
        }
    }
}

impl<DB> Executor for TraceEvm<DB>
where
    DB: DatabaseRef,
{
    /// Run one call on a throwaway overlay of the snapshot
    ///
    /// # Implementation Details
    /// 1. Reads the sender's nonce from the snapshot
    /// 2. Builds a fresh EVM over a cache layered on the snapshot
    /// 3. Executes with the hook adapter installed, without committing
    /// 4. Classifies the result; the overlay is dropped
    fn run(
        &mut self,
        call: &CallRequest,
        gas_limit: u64,
        tracer: Option<&mut dyn Tracer>,
    ) -> Result<ExecutionOutcome, RuntimeError> {
        let tx = self.build_tx(call, gas_limit)?;
        let (result, root_fault) = {
            let mut ctx = Context::mainnet().with_db(CacheDB::new(&self.db));
            configure_cfg(&mut ctx.cfg);
            let mut evm = ctx.build_mainnet_with_inspector(HookInspector::new(tracer));
            evm.set_block(self.block.clone());
            evm.set_tx(tx);
            let result = evm.inspect_replay();
            (result, evm.inspector.root_fault().cloned())
        };

        let outcome = match result {
            Ok(result_and_state) => outcome_from_result(result_and_state.result, root_fault),
            Err(EVMError::Transaction(err)) => rejected_outcome(err),
            Err(e) => return Err(RuntimeError::ExecutionFailed(e.to_string())),
        };
        trace!(gas_limit, gas_used = outcome.gas_used, error = ?outcome.error, "call executed");
        Ok(outcome)
    }

    fn balance(&mut self, address: Address) -> Result<U256, RuntimeError> {
        Ok(self
            .db
            .basic_ref(address)
            .map_err(|e| RuntimeError::AccountAccess(format!("Failed to get account info: {}", e)))?
            .map(|acc| acc.balance)
            .unwrap_or_default())
    }

    fn gas_ceiling(&self) -> u64 {
        self.block.gas_limit
    }
}

/// Simulation settings shared by every run
fn configure_cfg(cfg: &mut CfgEnv) {
    cfg.disable_eip3607 = true;
    cfg.limit_contract_code_size = None;
    cfg.disable_base_fee = true;
}

fn outcome_from_result(
    result: ExecutionResult<HaltReason>,
    root_fault: Option<ExecutionFault>,
) -> ExecutionOutcome {
    match result {
        ExecutionResult::Success {
            gas_used, output, ..
        } => ExecutionOutcome {
            gas_used,
            return_data: output.into_data(),
            error: None,
        },
        ExecutionResult::Revert { gas_used, output } => ExecutionOutcome {
            gas_used,
            return_data: output.clone(),
            error: Some(ExecutionFault::reverted(output)),
        },
        ExecutionResult::Halt { reason, gas_used } => ExecutionOutcome {
            gas_used,
            return_data: Bytes::new(),
            error: Some(fault_from_halt(reason, root_fault)),
        },
    }
}

fn fault_from_halt(reason: HaltReason, root_fault: Option<ExecutionFault>) -> ExecutionFault {
    match reason {
        HaltReason::OutOfGas(_) => ExecutionFault::OutOfGas,
        HaltReason::InvalidFEOpcode => ExecutionFault::InvalidOpcode(revm::bytecode::opcode::INVALID),
        HaltReason::OpcodeNotFound => match root_fault {
            Some(fault @ ExecutionFault::InvalidOpcode(_)) => fault,
            _ => ExecutionFault::Halted(format!("{reason:?}")),
        },
        other => ExecutionFault::Halted(format!("{other:?}")),
    }
}

fn rejected_outcome(err: InvalidTransaction) -> ExecutionOutcome {
    let fault = match err {
        InvalidTransaction::CallGasCostMoreThanGasLimit { .. }
        | InvalidTransaction::GasFloorMoreThanGasLimit { .. } => ExecutionFault::IntrinsicGas,
        other => ExecutionFault::Rejected(other.to_string()),
    };
    ExecutionOutcome {
        gas_used: 0,
        return_data: Bytes::new(),
        error: Some(fault),
    }
}
