//! Integration tests against a live JSON-RPC node
//!
//! # Test Infrastructure
//! - Uses a public Ethereum mainnet endpoint (override with `ETH_RPC_URL`)
//! - Requires multi-threaded tokio runtime
//! - Ignored by default: run with `cargo test -- --ignored`

use alloy::primitives::{address, U256};
use revm_probe::{create_evm_from_rpc, errors::InitError, types::CallRequest, EvmError};

fn rpc_url() -> String {
    std::env::var("ETH_RPC_URL").unwrap_or_else(|_| "https://eth.llamarpc.com".to_string())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_rpc_url() {
    let result = create_evm_from_rpc("not a url", Some(1)).await;
    assert!(matches!(result, Err(EvmError::Init(InitError::InvalidRpcUrl(_)))));
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires network access"]
async fn test_estimate_transfer_on_fork() {
    let mut evm = create_evm_from_rpc(&rpc_url(), None).await.unwrap();
    // Vitalik's account, holds more than 0.01 ETH
    let sender = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
    let call = CallRequest {
        from: sender,
        to: Some(address!("C255fC198eEdAC7AF8aF0f6e0ca781794B094A61")),
        value: U256::from(10_000_000_000_000_000u64),
        ..Default::default()
    };
    let gas = tokio::task::block_in_place(|| evm.estimate_gas(&call)).unwrap();
    assert!(gas >= 21_000);
}
