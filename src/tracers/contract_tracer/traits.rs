//! Trait implementations for ContractTracer
//!
//! - `TraceOutput`: converts recorded creations into the keyed output map

use std::collections::BTreeMap;

use crate::{tracers::contract_tracer::ContractTracer, traits::TraceOutput};

impl TraceOutput for ContractTracer {
    type Output = BTreeMap<String, String>;

    /// Lowercase 0x-hex address -> init code hex (or `""`), ordered by address
    fn get_output(&self) -> Self::Output {
        self.created
            .iter()
            .map(|(address, code)| (format!("{address:#x}"), code.clone()))
            .collect()
    }
}
