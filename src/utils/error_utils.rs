//! Revert payload decoding
//!
//! Solidity reverts carry one of two standard payloads:
//! - `Error(string)` (selector `0x08c379a0`) from `revert("...")` / `require(.., "...")`
//! - `Panic(uint256)` (selector `0x4e487b71`) from compiler-inserted checks
//!
//! Anything else (custom errors, bare `revert()`) is not decodable here and is
//! reported by callers as raw hex.

use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    primitives::hex,
};

const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];
const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Decodes the human-readable reason of a revert payload.
///
/// # Returns
/// * `Some(reason)` - the `Error(string)` message, or the panic description
/// * `None` - empty output, unknown selector, or malformed ABI encoding
///
/// # Example
/// ```
/// use revm_probe::utils::error_utils::decode_revert_reason;
/// use alloy::primitives::hex;
///
/// let data = hex::decode(
///     "08c379a0\
///      0000000000000000000000000000000000000000000000000000000000000020\
///      000000000000000000000000000000000000000000000000000000000000000d\
///      72657665727420726561736f6e00000000000000000000000000000000000000",
/// ).unwrap();
/// assert_eq!(decode_revert_reason(&data).as_deref(), Some("revert reason"));
/// ```
pub fn decode_revert_reason(output: &[u8]) -> Option<String> {
    if output.len() < 4 {
        return None;
    }
    let (selector, payload) = output.split_at(4);

    if selector == ERROR_STRING_SELECTOR {
        return match DynSolType::String.abi_decode(payload) {
            Ok(DynSolValue::String(reason)) => Some(reason),
            _ => None,
        };
    }

    if selector == PANIC_SELECTOR {
        if let Ok(DynSolValue::Uint(code, _)) = DynSolType::Uint(256).abi_decode(payload) {
            let description = match u64::try_from(code) {
                Ok(0x00) => "generic panic".to_string(),
                Ok(0x01) => "assert(false)".to_string(),
                Ok(0x11) => "arithmetic underflow or overflow".to_string(),
                Ok(0x12) => "division or modulo by zero".to_string(),
                Ok(0x21) => "enum overflow".to_string(),
                Ok(0x22) => "invalid encoded storage byte array accessed".to_string(),
                Ok(0x31) => "out-of-bounds array access; popping on an empty array".to_string(),
                Ok(0x32) => "out-of-bounds access of an array or bytesN".to_string(),
                Ok(0x41) => "out of memory".to_string(),
                Ok(0x51) => "uninitialized function".to_string(),
                _ => format!("unknown panic code: {code:#x}"),
            };
            return Some(description);
        }
    }

    None
}

/// Renders revert data as a `0x`-prefixed lowercase hex string.
pub fn revert_data_hex(output: &[u8]) -> String {
    format!("0x{}", hex::encode(output))
}
