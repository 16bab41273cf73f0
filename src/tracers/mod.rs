//! Tracers driven through the [`Tracer`](crate::traits::Tracer) hook protocol
//!
//! - `lifecycle`: tracer state machine and cross-thread cancellation
//! - `contract_tracer`: records contracts deployed during a call
//! - `registry`: builds tracers by name from JSON configuration

pub mod contract_tracer;
pub mod lifecycle;
pub mod registry;

pub use contract_tracer::{ContractTracer, ContractTracerConfig, OpcodeFilter, CONTRACT_TRACER_NAME};
pub use lifecycle::{InterruptHandle, TraceLifecycle, TracerState};
pub use registry::{construct_tracer, default_registry, TracerConstructor, TracerRegistry};
