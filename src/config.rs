//! Configuration and the host coordinator's version baseline.

use crate::error::{ProvError, ProvResult};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default cap on audit log entries kept by the registry.
pub const DEFAULT_MAX_AUDIT_ENTRIES: usize = 1000;

/// Process-start configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProvenanceConfig {
    /// Maximum audit log length; oldest entries are evicted first.
    pub max_audit_entries: usize,
    /// Canonical version the host declares for each shared dependency.
    pub host_versions: BTreeMap<String, String>,
}

impl Default for ProvenanceConfig {
    fn default() -> Self {
        Self {
            max_audit_entries: DEFAULT_MAX_AUDIT_ENTRIES,
            host_versions: BTreeMap::new(),
        }
    }
}

impl ProvenanceConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> ProvResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_max_audit_entries(mut self, max: usize) -> Self {
        self.max_audit_entries = max;
        self
    }

    #[must_use]
    pub fn with_host_version(mut self, dependency_id: &str, version: &str) -> Self {
        self.host_versions
            .insert(dependency_id.to_string(), version.to_string());
        self
    }

    pub fn validate(&self) -> ProvResult<()> {
        if self.max_audit_entries == 0 {
            return Err(ProvError::Config {
                key: "max_audit_entries".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        for (dependency_id, version) in &self.host_versions {
            if dependency_id.is_empty() {
                return Err(ProvError::Config {
                    key: "host_versions".to_string(),
                    message: "dependency id must be non-empty".to_string(),
                });
            }
            if !Version::is_valid(version) {
                return Err(ProvError::Config {
                    key: format!("host_versions.{}", dependency_id),
                    message: format!("'{}' is not a semantic version", version),
                });
            }
        }
        Ok(())
    }
}

/// The host's canonical version per shared dependency, fixed at start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostBaseline {
    versions: BTreeMap<String, Version>,
}

impl HostBaseline {
    /// A baseline with no declared versions; every binding classifies as unknown.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ProvenanceConfig) -> ProvResult<Self> {
        let mut baseline = Self::empty();
        for (dependency_id, version) in &config.host_versions {
            baseline = baseline.declare(dependency_id, version)?;
        }
        Ok(baseline)
    }

    /// Declare the canonical version of a dependency.
    pub fn declare(mut self, dependency_id: &str, version: &str) -> ProvResult<Self> {
        if dependency_id.is_empty() {
            return Err(ProvError::Validation {
                field: "dependency_id".to_string(),
                message: "baseline dependency id must be non-empty".to_string(),
            });
        }
        self.versions
            .insert(dependency_id.to_string(), Version::parse(version)?);
        Ok(self)
    }

    /// Canonical version string for a dependency, if the host declares one.
    pub fn expected(&self, dependency_id: &str) -> Option<String> {
        self.versions.get(dependency_id).map(Version::to_string)
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
