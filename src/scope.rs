//! Version-scoped shared library slots.
//!
//! Each published build of a shared library lives in its own slot keyed by
//! dependency and exact version. A module asks for exactly the slot it was
//! built against; nothing here chooses between candidate versions.

use crate::error::{ProvError, ProvResult};
use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

/// One published build of a shared library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharedLibrary {
    pub dependency_id: String,
    pub version: Version,
    /// Module that published this build, e.g. the host.
    pub provider: String,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct SharedScope {
    slots: RwLock<HashMap<String, BTreeMap<Version, SharedLibrary>>>,
}

impl SharedScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a build into its slot, replacing any earlier build there.
    pub fn provide(&self, dependency_id: &str, version: &str, provider: &str) -> ProvResult<SharedLibrary> {
        if dependency_id.is_empty() {
            return Err(ProvError::Validation {
                field: "dependency_id".to_string(),
                message: "shared library must have a non-empty dependency id".to_string(),
            });
        }
        let library = SharedLibrary {
            dependency_id: dependency_id.to_string(),
            version: Version::parse(version)?,
            provider: provider.to_string(),
            loaded_at: Utc::now(),
        };

        let replaced = self
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(dependency_id.to_string())
            .or_default()
            .insert(library.version.clone(), library.clone());
        if let Some(previous) = replaced {
            tracing::debug!(
                dependency = dependency_id,
                version = %library.version,
                previous_provider = %previous.provider,
                provider,
                "shared library slot replaced"
            );
        }
        Ok(library)
    }

    /// Look up the build published for an exact version.
    pub fn require(&self, dependency_id: &str, version: &str) -> ProvResult<SharedLibrary> {
        let wanted = Version::parse(version)?;
        let found = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(dependency_id)
            .and_then(|s| s.get(&wanted))
            .cloned();
        match found {
            Some(library) => Ok(library),
            None => {
                tracing::warn!(
                    dependency = dependency_id,
                    version = %wanted,
                    "shared library not loaded"
                );
                Err(ProvError::SharedLibraryMissing {
                    dependency_id: dependency_id.to_string(),
                    version: wanted.to_string(),
                })
            }
        }
    }

    pub fn is_provided(&self, dependency_id: &str, version: &str) -> bool {
        let Ok(wanted) = Version::parse(version) else {
            return false;
        };
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(dependency_id)
            .is_some_and(|s| s.contains_key(&wanted))
    }

    /// Every provided version of a dependency, ascending.
    pub fn versions(&self, dependency_id: &str) -> Vec<Version> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(dependency_id)
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default()
    }
}
