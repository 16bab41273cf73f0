//! EVM execution inspectors
//!
//! - `hook_inspector`: adapts revm's inspector callbacks to the
//!   [`Tracer`](crate::traits::Tracer) hook protocol

pub mod hook_inspector;

pub use hook_inspector::HookInspector;
