//! Bytecode scanning helpers
//!
//! Legacy EVM bytecode interleaves instructions with the immediate operands of
//! `PUSH1`..`PUSH32`. Any byte inside such an operand is data, so a naive
//! `contains` over the raw bytes reports false positives (e.g. `0x60f5` is a
//! `PUSH1 0xf5`, not a `CREATE2`). The functions here walk the code the way the
//! interpreter decodes it.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use revm::bytecode::opcode::{OpCode, PUSH1, PUSH32};

/// Mnemonic -> opcode byte, built from revm's opcode table.
static OPCODES_BY_NAME: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    (0..=u8::MAX)
        .filter_map(OpCode::new)
        .map(|op| (op.as_str(), op.get()))
        .collect()
});

/// Resolves an instruction mnemonic (`"CREATE2"`, `"SSTORE"`, `"STOP"`, ...) to its byte.
///
/// Names are matched exactly, upper case. Returns `None` for anything that is
/// not a defined instruction.
pub fn parse_opcode_name(name: &str) -> Option<u8> {
    OPCODES_BY_NAME.get(name).copied()
}

/// Number of immediate bytes following `opcode` (non-zero only for `PUSH1`..`PUSH32`).
#[inline]
pub fn push_immediate_len(opcode: u8) -> usize {
    if (PUSH1..=PUSH32).contains(&opcode) {
        (opcode - PUSH1 + 1) as usize
    } else {
        0
    }
}

/// Returns `true` if `opcode` occurs in `bytecode` as an instruction.
///
/// `PUSH1`..`PUSH32` are stepped over together with their operand in one jump
/// and never compared, so neither a push nor its data ever matches. A push
/// whose operand runs past the end of the code simply ends the scan.
///
/// # Example
/// ```
/// use revm_probe::utils::bytecode_utils::contains_opcode;
///
/// // PUSH1 0xf5, POP: the 0xf5 is data
/// assert!(!contains_opcode(&[0x60, 0xf5, 0x50], 0xf5));
/// // STOP, CREATE2
/// assert!(contains_opcode(&[0x00, 0xf5], 0xf5));
/// ```
pub fn contains_opcode(bytecode: &[u8], opcode: u8) -> bool {
    let mut pc = 0usize;
    while pc < bytecode.len() {
        let current = bytecode[pc];
        let immediate = push_immediate_len(current);
        if immediate == 0 && current == opcode {
            return true;
        }
        pc += 1 + immediate;
    }
    false
}
