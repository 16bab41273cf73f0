//! REVM-backed executor
//!
//! This module provides [`TraceEvm`], an [`Executor`](crate::traits::Executor)
//! that runs calls against a cached state snapshot.
//!
//! ## Key Components
//!
//! - **`TraceEvm`**: snapshot state plus block environment
//! - **`builder`**: constructors for in-memory and RPC-forked snapshots
//! - **`processor`**: call execution, outcome classification and the
//!   tracing / estimation entry points
//!
//! Every probe runs on a throwaway overlay of the snapshot, so repeated runs of
//! the same call (as the gas estimator does) all start from identical state.
//! Only [`TraceEvm::transact_commit`] and [`TraceEvm::deploy`] write back.
//!
//! ## Usage Examples
//!
//! ```
//! use revm_probe::{create_evm, types::{Address, CallRequest, U256}};
//!
//! let mut evm = create_evm();
//! let sender = Address::with_last_byte(0x01);
//! evm.insert_account(sender, U256::from(10u64).pow(U256::from(18u64)), None);
//!
//! let transfer = CallRequest { from: sender, to: Some(sender), ..Default::default() };
//! assert_eq!(evm.estimate_gas(&transfer).unwrap(), 21_000);
//! ```

use revm::{
    context::BlockEnv,
    database::{CacheDB, DatabaseRef},
    state::{AccountInfo, Bytecode},
};

use crate::types::{Address, Bytes, U256};

// Sub-modules for EVM functionality
pub mod builder;
pub mod processor;

/// Call executor over a cached state snapshot
///
/// # Type Parameters
/// - `DB`: backing state, read through [`DatabaseRef`]; accounts inserted with
///   [`TraceEvm::insert_account`] and committed transactions live in the cache
///   layer on top of it
pub struct TraceEvm<DB: DatabaseRef> {
    db: CacheDB<DB>,
    block: BlockEnv,
}

impl<DB> TraceEvm<DB>
where
    DB: DatabaseRef,
{
    /// Create an executor over `db` at the given block
    pub fn new(db: CacheDB<DB>, block: BlockEnv) -> Self {
        Self { db, block }
    }

    /// Block environment every call runs in
    pub fn block(&self) -> &BlockEnv {
        &self.block
    }

    /// Replace the block environment
    ///
    /// The block gas limit is also the gas estimation ceiling.
    pub fn set_block(&mut self, block: BlockEnv) {
        self.block = block;
    }

    /// Cached snapshot state
    pub fn db(&self) -> &CacheDB<DB> {
        &self.db
    }

    /// Mutable access to the cached snapshot state
    pub fn db_mut(&mut self) -> &mut CacheDB<DB> {
        &mut self.db
    }

    /// Insert or replace an account in the snapshot
    ///
    /// With `code`, the account is installed as a contract (nonce 1) running
    /// that runtime bytecode.
    pub fn insert_account(&mut self, address: Address, balance: U256, code: Option<Bytes>) {
        let info = match code {
            Some(code) => {
                let bytecode = Bytecode::new_raw(code);
                AccountInfo {
                    balance,
                    nonce: 1,
                    code_hash: bytecode.hash_slow(),
                    code: Some(bytecode),
                }
            }
            None => AccountInfo {
                balance,
                ..Default::default()
            },
        };
        self.db.insert_account_info(address, info);
    }

    /// Drop every cached account, contract and committed change
    ///
    /// Subsequent reads go back to the backing database.
    pub fn reset_db(&mut self) {
        let cache = &mut self.db.cache;
        cache.accounts.clear();
        cache.contracts.clear();
        cache.logs = Vec::new();
        cache.block_hashes.clear();
    }
}
