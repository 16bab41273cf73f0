//! Binary-search gas estimation
//!
//! Finds the smallest gas limit under which a call succeeds by repeatedly
//! running it through an [`Executor`]. Works against any executor, so the
//! search itself is tested without a virtual machine.
//!
//! # Algorithm
//!
//! 1. Upper bound `hi`: the caller's gas (clamped to the executor's ceiling),
//!    else the ceiling; optionally capped by configuration and, for priced
//!    calls, by what the sender's balance can pay for.
//! 2. Lower bound: one below the intrinsic cost of the call.
//! 3. Plain transfers are tried at exactly the intrinsic cost first.
//! 4. One probe at `hi` decides feasibility and classifies hopeless calls.
//! 5. Bisection: success lowers `hi`, any execution failure raises `lo`. A
//!    revert below `hi` is a gas effect (for example a starved sub-call), so
//!    only a rejected transaction ends the search early.
//!
//! Success is assumed monotone in the gas limit.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::EstimateError,
    traits::Executor,
    types::{CallRequest, ExecutionFault, U256},
};

/// Base cost of every transaction
pub const TX_GAS: u64 = 21_000;
/// Base cost of a contract creation transaction
pub const TX_GAS_CONTRACT_CREATION: u64 = 53_000;
/// Cost per zero byte of call data
pub const TX_DATA_ZERO_GAS: u64 = 4;
/// Cost per non-zero byte of call data
pub const TX_DATA_NON_ZERO_GAS: u64 = 16;
/// Cost per 32-byte word of init code
pub const INIT_CODE_WORD_GAS: u64 = 2;

/// Estimator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimatorConfig {
    /// Global cap on the upper bound, applied after the ceiling
    pub gas_cap: Option<u64>,
    /// Try plain transfers at the intrinsic cost before searching
    pub transfer_shortcut: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            gas_cap: None,
            transfer_shortcut: true,
        }
    }
}

/// Intrinsic gas of `call`: the cost charged before any code runs
///
/// Access lists and authorization lists are not modelled.
pub fn intrinsic_gas(call: &CallRequest) -> u64 {
    let is_create = call.to.is_none();
    let zeros = call.data.iter().filter(|byte| **byte == 0).count() as u64;
    let non_zeros = call.data.len() as u64 - zeros;

    let mut gas = if is_create { TX_GAS_CONTRACT_CREATION } else { TX_GAS };
    gas = gas
        .saturating_add(zeros.saturating_mul(TX_DATA_ZERO_GAS))
        .saturating_add(non_zeros.saturating_mul(TX_DATA_NON_ZERO_GAS));
    if is_create {
        let words = (call.data.len() as u64).div_ceil(32);
        gas = gas.saturating_add(words.saturating_mul(INIT_CODE_WORD_GAS));
    }
    gas
}

/// Gas estimator
#[derive(Debug, Clone, Default)]
pub struct GasEstimator {
    config: EstimatorConfig,
}

impl GasEstimator {
    /// Create an estimator with the given settings
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Estimator settings
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate using the executor's own gas ceiling
    pub fn estimate<E>(&self, executor: &mut E, call: &CallRequest) -> Result<u64, EstimateError>
    where
        E: Executor + ?Sized,
    {
        let ceiling = executor.gas_ceiling();
        self.estimate_with_ceiling(executor, call, ceiling)
    }

    /// Estimate the minimum gas limit under which `call` succeeds
    ///
    /// # Returns
    /// * `Ok(gas)` - the minimal successful limit
    /// * `Err(GasExceedsAllowance)` - not even the upper bound suffices
    /// * `Err(AlwaysFailing)` - the call fails at the upper bound for a non-gas reason
    /// * `Err(InsufficientFunds)` - the value exceeds the sender's balance
    /// * `Err(Rejected)` - the executor refused the transaction itself
    pub fn estimate_with_ceiling<E>(
        &self,
        executor: &mut E,
        call: &CallRequest,
        ceiling: u64,
    ) -> Result<u64, EstimateError>
    where
        E: Executor + ?Sized,
    {
        let floor = intrinsic_gas(call);

        let mut hi = match call.gas {
            Some(gas) if gas > 0 => gas.min(ceiling),
            _ => ceiling,
        };
        if let Some(cap) = self.config.gas_cap {
            hi = hi.min(cap);
        }
        if let Some(allowance) = funds_allowance(executor, call)? {
            hi = hi.min(allowance);
        }
        let cap = hi;
        debug!(from = %call.from, floor, cap, "estimating gas");

        if hi < floor {
            return Err(EstimateError::GasExceedsAllowance(cap));
        }

        if self.config.transfer_shortcut && call.is_plain_transfer() {
            let outcome = executor.run(call, floor, None)?;
            if outcome.is_success() {
                debug!(gas = floor, "plain transfer at intrinsic cost");
                return Ok(floor);
            }
        }

        let outcome = executor.run(call, hi, None)?;
        if let Some(fault) = outcome.error {
            debug!(gas = hi, %fault, "call fails at the upper bound");
            return Err(match fault {
                fault if fault.is_gas_related() => EstimateError::GasExceedsAllowance(cap),
                ExecutionFault::Rejected(reason) => EstimateError::Rejected(reason),
                fault => EstimateError::AlwaysFailing(fault),
            });
        }

        // Gas used at `hi` is a lower bound on the required limit
        let mut lo = floor
            .saturating_sub(1)
            .max(outcome.gas_used.saturating_sub(1));

        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            let outcome = executor.run(call, mid, None)?;
            debug!(gas = mid, lo, hi, success = outcome.is_success(), "estimate probe");
            // The call succeeded at the upper bound, so any fault below it depends on gas
            match outcome.error {
                None => hi = mid,
                Some(ExecutionFault::Rejected(reason)) => return Err(EstimateError::Rejected(reason)),
                Some(_) => lo = mid,
            }
        }
        debug!(gas = hi, "gas estimated");
        Ok(hi)
    }
}

/// Gas the sender can pay for at the call's price, `None` for unpriced calls
fn funds_allowance<E>(executor: &mut E, call: &CallRequest) -> Result<Option<u64>, EstimateError>
where
    E: Executor + ?Sized,
{
    let price = match call.gas_price {
        Some(price) if price > 0 => price,
        _ => return Ok(None),
    };
    let balance = executor.balance(call.from)?;
    if call.value > balance {
        return Err(EstimateError::InsufficientFunds);
    }
    let available = (balance - call.value) / U256::from(price);
    Ok(Some(u64::try_from(available).unwrap_or(u64::MAX)))
}
