//! Executor constructors
//!
//! - [`create_evm`]: empty in-memory state, for tests and local simulation
//! - [`create_evm_with_db`]: any [`DatabaseRef`] backend at a chosen block
//! - [`create_evm_from_rpc`]: state forked lazily from a JSON-RPC node

use alloy::{
    eips::BlockId,
    network::AnyNetwork,
    providers::{Provider, RootProvider},
};
use revm::{
    context::BlockEnv,
    database::{AlloyDB, CacheDB, DatabaseRef, EmptyDB},
    database_interface::async_db::WrapDatabaseAsync,
};
use tracing::debug;

use crate::{
    errors::{EvmError, InitError},
    evm::TraceEvm,
    utils::block_utils::create_block_env,
};

/// Remote state fetched on demand through an RPC provider
pub type ForkDb = WrapDatabaseAsync<AlloyDB<AnyNetwork, RootProvider<AnyNetwork>>>;

/// Executor over empty in-memory state
pub type DefaultEvm = TraceEvm<EmptyDB>;

/// Executor over RPC-forked state
pub type ForkEvm = TraceEvm<ForkDb>;

/// Create an executor over empty in-memory state
///
/// The block is number 0 with the default block gas limit.
///
/// # Example
/// ```
/// use revm_probe::create_evm;
/// use revm_probe::utils::block_utils::DEFAULT_BLOCK_GAS_LIMIT;
///
/// let evm = create_evm();
/// assert_eq!(evm.block().gas_limit, DEFAULT_BLOCK_GAS_LIMIT);
/// ```
pub fn create_evm() -> DefaultEvm {
    create_evm_with_db(EmptyDB::default(), create_block_env(0, 0, None))
}

/// Create an executor over an arbitrary backend
pub fn create_evm_with_db<DB>(db: DB, block: BlockEnv) -> TraceEvm<DB>
where
    DB: DatabaseRef,
{
    TraceEvm::new(CacheDB::new(db), block)
}

/// Create an executor forked from a JSON-RPC node
///
/// State is fetched lazily at `block_number` (the latest block if `None`) and
/// cached locally. Must be called from within a multi-threaded tokio runtime;
/// execution itself is synchronous.
///
/// # Example
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use revm_probe::create_evm_from_rpc;
/// let evm = create_evm_from_rpc("https://eth.llamarpc.com", None).await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_evm_from_rpc(
    rpc_url: &str,
    block_number: Option<u64>,
) -> Result<ForkEvm, EvmError> {
    let url = rpc_url
        .parse()
        .map_err(|_| InitError::InvalidRpcUrl(rpc_url.to_string()))?;
    let provider = RootProvider::<AnyNetwork>::new_http(url);

    let number = match block_number {
        Some(number) => number,
        None => provider
            .get_block_number()
            .await
            .map_err(|e| InitError::BlockNumber(e.to_string()))?,
    };
    debug!(rpc_url, number, "forking state");

    let alloy_db = AlloyDB::new(provider, BlockId::number(number));
    let db = WrapDatabaseAsync::new(alloy_db)
        .ok_or_else(|| InitError::Database("a tokio runtime is required".to_string()))?;
    Ok(create_evm_with_db(db, create_block_env(number, 0, None)))
}
