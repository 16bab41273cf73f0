//! Contract creation tracer
//!
//! Records every contract deployed during a traced call, optionally limited to
//! deployments whose init code contains a given instruction.
//!
//! # Architecture
//!
//! - `tracer`: [`Tracer`](crate::traits::Tracer) hook implementation
//! - `traits`: [`TraceOutput`](crate::traits::TraceOutput) implementation
//!
//! # Configuration
//!
//! ```json
//! { "opCode": "CREATE2", "withByteCode": true }
//! ```
//!
//! - `opCode`: instruction mnemonic; empty matches every creation. A name that
//!   is not a defined instruction matches nothing.
//! - `withByteCode`: attach the init code (0x-hex) to each observation.
//!
//! # Output
//!
//! A JSON object keyed by the lowercase 0x-hex address of each created
//! contract. Values are the init code, or `""` when `withByteCode` is off.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    tracers::lifecycle::TraceLifecycle,
    traits::Tracer,
    types::{Address, Bytes},
    utils::bytecode_utils::{contains_opcode, parse_opcode_name},
};

mod tracer;
mod traits;

/// Name under which the tracer is registered
pub const CONTRACT_TRACER_NAME: &str = "contractTracer";

/// Contract tracer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractTracerConfig {
    /// Instruction mnemonic the init code must contain; empty for none
    pub op_code: String,
    /// Whether to record init code alongside each address
    pub with_byte_code: bool,
}

/// Creation filter resolved from [`ContractTracerConfig::op_code`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeFilter {
    /// Record every creation
    Any,
    /// Record creations whose init code contains this instruction
    Only(u8),
    /// Unknown mnemonic, record nothing
    Invalid,
}

impl OpcodeFilter {
    /// Resolves a mnemonic; `""` means no filter
    pub fn from_name(name: &str) -> Self {
        if name.is_empty() {
            return OpcodeFilter::Any;
        }
        match parse_opcode_name(name) {
            Some(opcode) => OpcodeFilter::Only(opcode),
            None => OpcodeFilter::Invalid,
        }
    }

    /// Whether a creation with this init code passes the filter
    pub fn matches(&self, init_code: &[u8]) -> bool {
        match self {
            OpcodeFilter::Any => true,
            OpcodeFilter::Only(opcode) => contains_opcode(init_code, *opcode),
            OpcodeFilter::Invalid => false,
        }
    }
}

/// Tracer collecting deployed contracts
///
/// Matching is decided when a creation frame starts; the observation is stored
/// when that frame exits and reports the address it deployed to. A creation
/// that fails before an address is assigned records nothing.
#[derive(Debug)]
pub struct ContractTracer {
    /// Address -> init code hex (or `""`)
    created: HashMap<Address, String>,
    /// One entry per open frame; `Some` carries the pending observation
    pending: Vec<Option<String>>,
    filter: OpcodeFilter,
    with_byte_code: bool,
    lifecycle: TraceLifecycle,
}

impl ContractTracer {
    /// Creates a tracer from a parsed configuration
    pub fn new(config: ContractTracerConfig) -> Self {
        Self {
            created: HashMap::new(),
            pending: Vec::new(),
            filter: OpcodeFilter::from_name(&config.op_code),
            with_byte_code: config.with_byte_code,
            lifecycle: TraceLifecycle::new(),
        }
    }

    /// Creates a tracer from raw JSON configuration
    ///
    /// An empty (or whitespace-only) input selects the defaults.
    pub fn from_json(config: &[u8]) -> Result<Self, serde_json::Error> {
        let config = if config.iter().all(u8::is_ascii_whitespace) {
            ContractTracerConfig::default()
        } else {
            serde_json::from_slice(config)?
        };
        Ok(Self::new(config))
    }

    /// Registry constructor
    pub fn boxed_from_json(config: &[u8]) -> Result<Box<dyn Tracer>, serde_json::Error> {
        Ok(Box::new(Self::from_json(config)?))
    }

    /// Resolved creation filter
    pub fn filter(&self) -> OpcodeFilter {
        self.filter
    }

    /// Contracts recorded so far
    pub fn get_created(&self) -> &HashMap<Address, String> {
        &self.created
    }

    fn observe(&self, init_code: &Bytes) -> Option<String> {
        if !self.filter.matches(init_code) {
            return None;
        }
        Some(if self.with_byte_code {
            format!("0x{}", alloy::hex::encode(init_code))
        } else {
            String::new()
        })
    }
}

impl Default for ContractTracer {
    fn default() -> Self {
        Self::new(ContractTracerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::TracerError,
        tracers::lifecycle::TracerState,
        types::{CallFrame, FrameExit, FrameKind, U256},
    };

    const FACTORY: Address = Address::with_last_byte(0xfa);
    const CHILD: Address = Address::with_last_byte(0xc0);
    const CHILD_KEY: &str = "0x00000000000000000000000000000000000000c0";

    fn frame(kind: FrameKind, to: Option<Address>, input: &[u8], depth: usize) -> CallFrame {
        CallFrame {
            kind,
            from: Address::ZERO,
            to,
            input: Bytes::copy_from_slice(input),
            value: U256::ZERO,
            gas: 1_000_000,
            depth,
        }
    }

    fn ok_exit() -> FrameExit {
        FrameExit {
            output: Bytes::new(),
            gas_used: 0,
            error: None,
        }
    }

    /// Root call into the factory which deploys one child with `init_code`
    fn run_factory(tracer: &mut ContractTracer, kind: FrameKind, init_code: &[u8]) {
        let root = frame(FrameKind::Call, Some(FACTORY), &[], 0);
        tracer.on_call_start(&root);
        let create = frame(kind, None, init_code, 1);
        tracer.on_call_start(&create);
        let created = CallFrame {
            to: Some(CHILD),
            ..create
        };
        tracer.on_call_end(&created, &ok_exit());
        tracer.on_call_end(&root, &ok_exit());
    }

    fn result(tracer: &mut ContractTracer) -> serde_json::Value {
        tracer.extract_result().unwrap()
    }

    #[test]
    fn test_config_parsing() {
        let tracer = ContractTracer::from_json(br#"{"opCode":"CREATE2","withByteCode":true}"#).unwrap();
        assert_eq!(tracer.filter(), OpcodeFilter::Only(0xf5));
        assert!(tracer.with_byte_code);

        let tracer = ContractTracer::from_json(b"").unwrap();
        assert_eq!(tracer.filter(), OpcodeFilter::Any);
        assert!(!tracer.with_byte_code);

        let tracer = ContractTracer::from_json(b"{}").unwrap();
        assert_eq!(tracer.filter(), OpcodeFilter::Any);

        assert!(ContractTracer::from_json(b"{\"opCode\":").is_err());
    }

    #[test]
    fn test_filter_names() {
        assert_eq!(OpcodeFilter::from_name(""), OpcodeFilter::Any);
        assert_eq!(OpcodeFilter::from_name("STOP"), OpcodeFilter::Only(0x00));
        assert_eq!(OpcodeFilter::from_name("SSTORE"), OpcodeFilter::Only(0x55));
        assert_eq!(OpcodeFilter::from_name("NOT_AN_OPCODE"), OpcodeFilter::Invalid);
        assert!(!OpcodeFilter::Invalid.matches(&[0x00]));
        assert!(OpcodeFilter::Any.matches(&[]));
    }

    #[test]
    fn test_records_all_creations_without_bytecode() {
        let mut tracer = ContractTracer::default();
        run_factory(&mut tracer, FrameKind::Create, &[0x60, 0x00]);
        assert_eq!(
            result(&mut tracer),
            serde_json::json!({ CHILD_KEY: "" })
        );
    }

    #[test]
    fn test_opcode_in_push_data_is_ignored() {
        let mut tracer = ContractTracer::new(ContractTracerConfig {
            op_code: "CREATE2".to_string(),
            with_byte_code: true,
        });
        // PUSH2 0xf5f5, POP, STOP
        run_factory(&mut tracer, FrameKind::Create, &[0x61, 0xf5, 0xf5, 0x50, 0x00]);
        assert_eq!(result(&mut tracer), serde_json::json!({}));
    }

    #[test]
    fn test_records_matching_creation_with_bytecode() {
        let mut tracer = ContractTracer::new(ContractTracerConfig {
            op_code: "CREATE2".to_string(),
            with_byte_code: true,
        });
        run_factory(&mut tracer, FrameKind::Create2, &[0x00, 0xf5]);
        assert_eq!(
            result(&mut tracer),
            serde_json::json!({ CHILD_KEY: "0x00f5" })
        );
    }

    #[test]
    fn test_creation_without_address_is_skipped() {
        let mut tracer = ContractTracer::default();
        let root = frame(FrameKind::Create, None, &[0xfe], 0);
        tracer.on_call_start(&root);
        tracer.on_call_end(
            &root,
            &FrameExit {
                output: Bytes::new(),
                gas_used: 0,
                error: Some(crate::types::ExecutionFault::InvalidOpcode(0xfe)),
            },
        );
        assert_eq!(result(&mut tracer), serde_json::json!({}));
    }

    #[test]
    fn test_extract_before_completion() {
        let mut tracer = ContractTracer::default();
        tracer.on_call_start(&frame(FrameKind::Call, Some(FACTORY), &[], 0));
        assert_eq!(tracer.state(), TracerState::Running);
        assert!(matches!(tracer.extract_result(), Err(TracerError::NotCompleted)));
    }

    #[test]
    fn test_cancel_discards_observations() {
        let mut tracer = ContractTracer::default();
        let root = frame(FrameKind::Call, Some(FACTORY), &[], 0);
        tracer.on_call_start(&root);
        tracer.request_cancel("execution timeout");

        let create = frame(FrameKind::Create, None, &[0x00], 1);
        tracer.on_call_start(&create);
        tracer.on_call_end(&CallFrame { to: Some(CHILD), ..create }, &ok_exit());
        tracer.on_call_end(&root, &ok_exit());

        assert!(tracer.get_created().is_empty());
        assert_eq!(tracer.state(), TracerState::Interrupted);
        match tracer.extract_result() {
            Err(TracerError::Interrupted(reason)) => assert_eq!(reason, "execution timeout"),
            other => panic!("expected interruption, got {other:?}"),
        }
    }
}
