//! Shared fixtures for the integration tests
//!
//! - a funded sender on an in-memory executor
//! - `ESTIMATOR_CONTRACT`: a small contract with one function per failure mode
//! - `FACTORY_RUNTIME`: a contract that deploys two children when called

#![allow(dead_code)]

use alloy::primitives::{hex, Address, Bytes, U256};
use revm::database::EmptyDB;
use revm_probe::{create_evm, types::CallRequest, TraceEvm};

/// Creation code of a contract exposing:
/// - `Revert()` reverting with `Error("revert reason")`
/// - `PureRevert()` reverting without data
/// - `OOG()` looping forever
/// - `Assert()` failing an assertion (`INVALID`)
/// - `Valid()` returning normally
pub const ESTIMATOR_CONTRACT: &str = "608060405234801561001057600080fd5b50610156806100206000396000f3fe608060405234801561001057600080fd5b50600436106100575760003560e01c806350f6fe341461005c578063aa8b1d3014610066578063b9b046f914610070578063d8b983911461007a578063e09fface14610084575b600080fd5b61006461008e565b005b61006e6100a1565b005b6100786100a6565b005b6100826100b0565b005b61008c61011e565b005b60008090505b8080600101915050610094565b600080fd5b60006100ae57fe5b565b6040517f08c379a000000000000000000000000000000000000000000000000000000000815260040180806020018281038252600d8152602001807f72657665727420726561736f6e0000000000000000000000000000000000000081525060200191505060405180910390fd5b56fea26469706673582212206f8c043de30823c47c0df44a4404868a45bd4fbb4ff8846a6e1f476d79d3297764736f6c63430006040033";

pub const REVERT_SELECTOR: [u8; 4] = [0xd8, 0xb9, 0x83, 0x91];
pub const PURE_REVERT_SELECTOR: [u8; 4] = [0xaa, 0x8b, 0x1d, 0x30];
pub const OOG_SELECTOR: [u8; 4] = [0x50, 0xf6, 0xfe, 0x34];
pub const ASSERT_SELECTOR: [u8; 4] = [0xb9, 0xb0, 0x46, 0xf9];
pub const VALID_SELECTOR: [u8; 4] = [0xe0, 0x9f, 0xfa, 0xce];

/// Runtime code that, when called:
/// 1. CREATEs a child with init code `61f5f55000` (PUSH2 0xf5f5, POP, STOP)
/// 2. CREATE2s (salt 0) a child with init code `00f5` (STOP, CREATE2)
pub const FACTORY_RUNTIME: &str = concat!(
    "6461f5f55000", // PUSH5 init code
    "600052",       // MSTORE at 0
    "6005601b6000", // size 5, offset 27, value 0
    "f050",         // CREATE, POP
    "6100f5",       // PUSH2 init code
    "602052",       // MSTORE at 32
    "6000600260",   // salt 0, size 2
    "3e6000",       // offset 62, value 0
    "f550",         // CREATE2, POP
    "00",           // STOP
);

/// Init code of the CREATE child
pub const CREATE_CHILD_INIT: [u8; 5] = [0x61, 0xf5, 0xf5, 0x50, 0x00];
/// Init code of the CREATE2 child
pub const CREATE2_CHILD_INIT: [u8; 2] = [0x00, 0xf5];

/// Runtime code that CALLs `STORE_CHILD` with all but 1/64 of its gas and
/// reverts unless the call succeeded
pub const FORWARDER_RUNTIME: &str = concat!(
    "5f5f5f5f5f",                                 // ret, args and value all zero
    "730000000000000000000000000000000000000000c1", // PUSH20 STORE_CHILD
    "5af1",                                       // GAS, CALL
    "602257",                                     // JUMPI to 0x22 on success
    "5f5ffd",                                     // REVERT
    "5b00",                                       // JUMPDEST, STOP
);

/// Runtime code that writes 1 to slot 0 (a fresh SSTORE, 22_100 gas)
pub const STORE_CHILD_RUNTIME: &str = "600160005500";

pub const SENDER: Address = Address::with_last_byte(0x5e);
pub const FACTORY: Address = Address::with_last_byte(0xfa);
pub const FORWARDER: Address = Address::with_last_byte(0xca);
pub const STORE_CHILD: Address = Address::with_last_byte(0xc1);

pub fn one_ether() -> U256 {
    U256::from(1_000_000_000_000_000_000u128)
}

/// In-memory executor with a sender holding one ether
pub fn funded_evm() -> TraceEvm<EmptyDB> {
    let mut evm = create_evm();
    evm.insert_account(SENDER, one_ether(), None);
    evm
}

/// Funded executor with the estimator contract deployed by `SENDER`
pub fn evm_with_contract() -> (TraceEvm<EmptyDB>, Address) {
    let mut evm = funded_evm();
    let code = Bytes::from(hex::decode(ESTIMATOR_CONTRACT).expect("valid hex"));
    let contract = evm.deploy(SENDER, code).expect("deployment succeeds");
    (evm, contract)
}

/// Funded executor with the factory installed at `FACTORY` (nonce 1)
pub fn evm_with_factory() -> TraceEvm<EmptyDB> {
    let mut evm = funded_evm();
    let code = Bytes::from(hex::decode(FACTORY_RUNTIME).expect("valid hex"));
    evm.insert_account(FACTORY, U256::ZERO, Some(code));
    evm
}

/// Funded executor with `FORWARDER` and `STORE_CHILD` installed
pub fn evm_with_forwarder() -> TraceEvm<EmptyDB> {
    let mut evm = funded_evm();
    for (address, runtime) in [(FORWARDER, FORWARDER_RUNTIME), (STORE_CHILD, STORE_CHILD_RUNTIME)] {
        let code = Bytes::from(hex::decode(runtime).expect("valid hex"));
        evm.insert_account(address, U256::ZERO, Some(code));
    }
    evm
}

/// Call from `SENDER` to `to` with the given input
pub fn call_to(to: Address, data: &[u8]) -> CallRequest {
    CallRequest {
        from: SENDER,
        to: Some(to),
        data: Bytes::copy_from_slice(data),
        ..Default::default()
    }
}

/// Address the factory's CREATE child is deployed to
pub fn create_child_address() -> Address {
    FACTORY.create(1)
}

/// Address the factory's CREATE2 child is deployed to
pub fn create2_child_address() -> Address {
    FACTORY.create2_from_code([0u8; 32], CREATE2_CHILD_INIT)
}

/// Key under which tracers report an address
pub fn address_key(address: Address) -> String {
    format!("{address:#x}")
}
