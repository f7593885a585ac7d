//! Provenance registry: what was loaded, by whom, and when.

use crate::config::ProvenanceConfig;
use crate::error::ProvResult;
use crate::types::{BindingSource, DependencyBinding};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    binding: DependencyBinding,
}

#[derive(Debug, Default)]
struct RegistryState {
    latest: HashMap<String, Entry>,
    log: VecDeque<Entry>,
    next_seq: u64,
}

/// Counts of current bindings by source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrySummary {
    pub host_provided: usize,
    pub local_fallback: usize,
    pub unknown: usize,
}

impl RegistrySummary {
    pub fn total(&self) -> usize {
        self.host_provided + self.local_fallback + self.unknown
    }
}

/// Thread-safe, in-memory record of dependency bindings.
///
/// Keeps the latest binding per module (last write wins) and a bounded,
/// chronological audit log. The lock is held only for map and queue
/// updates, never across I/O.
#[derive(Debug)]
pub struct ProvenanceRegistry {
    state: RwLock<RegistryState>,
    capacity: usize,
}

impl ProvenanceRegistry {
    /// Create a registry with the default audit log cap.
    pub fn new() -> Self {
        Self::with_capacity(crate::config::DEFAULT_MAX_AUDIT_ENTRIES)
    }

    /// Create a registry whose audit log holds at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn with_config(config: &ProvenanceConfig) -> ProvResult<Self> {
        config.validate()?;
        Ok(Self::with_capacity(config.max_audit_entries))
    }

    // Poisoning only means another recorder panicked mid-insert; the maps
    // are still structurally valid, and recording must never fail.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a binding as the module's current one and append it to the log.
    pub fn record(&self, binding: DependencyBinding) {
        let mut evicted = Vec::new();
        {
            let mut state = self.write();
            let entry = Entry { seq: state.next_seq, binding };
            state.next_seq += 1;

            while state.log.len() >= self.capacity {
                let Some(oldest) = state.log.pop_front() else {
                    break;
                };
                let module = &oldest.binding.module_name;
                if state.latest.get(module).map(|e| e.seq) == Some(oldest.seq) {
                    state.latest.remove(module);
                }
                evicted.push(oldest);
            }

            state
                .latest
                .insert(entry.binding.module_name.clone(), entry.clone());
            state.log.push_back(entry);
        }

        // Logged after the guard is released: subscribers may do I/O.
        for entry in &evicted {
            tracing::debug!(
                module = %entry.binding.module_name,
                dependency = %entry.binding.dependency_id,
                capacity = self.capacity,
                "evicted oldest audit entry"
            );
        }
    }

    /// Latest binding recorded for a module, if it ever reported.
    pub fn current(&self, module_name: &str) -> Option<DependencyBinding> {
        self.read()
            .latest
            .get(module_name)
            .map(|e| e.binding.clone())
    }

    /// The audit log in chronological order.
    pub fn all(&self) -> Vec<DependencyBinding> {
        self.read().log.iter().map(|e| e.binding.clone()).collect()
    }

    /// Number of audit log entries.
    pub fn len(&self) -> usize {
        self.read().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().log.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Names of modules with a current binding, sorted.
    pub fn modules(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().latest.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn summary(&self) -> RegistrySummary {
        let state = self.read();
        let mut summary = RegistrySummary::default();
        for entry in state.latest.values() {
            match entry.binding.source {
                BindingSource::HostProvided => summary.host_provided += 1,
                BindingSource::LocalFallback => summary.local_fallback += 1,
                BindingSource::Unknown => summary.unknown += 1,
            }
        }
        summary
    }

    /// Audit log as a JSON array, oldest first.
    pub fn export_json(&self) -> ProvResult<serde_json::Value> {
        Ok(serde_json::to_value(self.all())?)
    }

    pub fn clear(&self) {
        let mut state = self.write();
        state.latest.clear();
        state.log.clear();
    }
}

impl Default for ProvenanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
