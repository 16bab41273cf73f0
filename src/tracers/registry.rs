//! Named tracer construction
//!
//! Tracers are looked up by name and built from raw JSON configuration. The
//! process-wide [`default_registry`] is populated once, on first use, with the
//! built-in tracers and is read-only afterwards, so concurrent lookups need no
//! locking. Callers that want extra tracers build their own [`TracerRegistry`].

use std::{collections::HashMap, fmt};

use once_cell::sync::Lazy;
use tracing::trace;

use crate::{
    errors::TracerError,
    tracers::contract_tracer::{ContractTracer, CONTRACT_TRACER_NAME},
    traits::Tracer,
};

/// Builds a tracer from its raw JSON configuration
pub type TracerConstructor = fn(&[u8]) -> Result<Box<dyn Tracer>, serde_json::Error>;

static DEFAULT_REGISTRY: Lazy<TracerRegistry> = Lazy::new(TracerRegistry::with_builtins);

/// Name -> constructor table
#[derive(Clone, Default)]
pub struct TracerRegistry {
    constructors: HashMap<String, TracerConstructor>,
}

impl TracerRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in tracers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(CONTRACT_TRACER_NAME, ContractTracer::boxed_from_json);
        registry
    }

    /// Registers a constructor, returning the one it replaced
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: TracerConstructor,
    ) -> Option<TracerConstructor> {
        self.constructors.insert(name.into(), constructor)
    }

    /// Whether a tracer is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Builds the tracer registered under `name`
    ///
    /// # Returns
    /// * `Ok(Box<dyn Tracer>)` - a fresh, idle tracer
    /// * `Err(TracerError::NotFound)` - no tracer registered under `name`
    /// * `Err(TracerError::InvalidConfig)` - the configuration was rejected
    pub fn construct(&self, name: &str, config: &[u8]) -> Result<Box<dyn Tracer>, TracerError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| TracerError::NotFound(name.to_string()))?;
        trace!(tracer = name, config_len = config.len(), "constructing tracer");
        constructor(config).map_err(|e| TracerError::InvalidConfig {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Debug for TracerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// The process-wide registry with the built-in tracers
pub fn default_registry() -> &'static TracerRegistry {
    &DEFAULT_REGISTRY
}

/// Builds a tracer from the process-wide registry
///
/// # Example
/// ```
/// use revm_probe::tracers::construct_tracer;
///
/// let tracer = construct_tracer("contractTracer", br#"{"opCode":"CREATE2"}"#).unwrap();
/// assert!(construct_tracer("noSuchTracer", b"").is_err());
/// # drop(tracer);
/// ```
pub fn construct_tracer(name: &str, config: &[u8]) -> Result<Box<dyn Tracer>, TracerError> {
    default_registry().construct(name, config)
}
