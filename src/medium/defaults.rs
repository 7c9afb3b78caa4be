//! # Bundled Default Payloads
//!
//! Stand-in for build-time-bundled resources: a read-only lookup consulted
//! once, on first miss, by stores configured to allow it.

use std::collections::HashMap;

/// Read-only source of default payloads, keyed by storage key.
pub trait DefaultSource: Send + Sync + std::fmt::Debug {
    /// The bundled payload for `key`, if one ships with the build.
    fn default_for(&self, key: &str) -> Option<Vec<u8>>;
}

/// A source with no defaults at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaults;

impl DefaultSource for NoDefaults {
    fn default_for(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }
}

/// An owned key -> payload table, populated at construction.
#[derive(Debug, Default)]
pub struct StaticDefaults {
    entries: HashMap<String, Vec<u8>>,
}

impl StaticDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundled payload for `key`.
    pub fn with(mut self, key: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(key.into(), payload.into());
        self
    }
}

impl DefaultSource for StaticDefaults {
    fn default_for(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }
}
