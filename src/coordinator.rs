//! Mount coordinator: resolve, time and report each module mount.

use crate::config::{HostBaseline, ProvenanceConfig};
use crate::error::ProvResult;
use crate::registry::ProvenanceRegistry;
use crate::reporter::{LogSink, Reporter};
use crate::resolver::{DependencyResolver, MountTimer};
use crate::scope::SharedScope;
use crate::types::DependencyBinding;
use std::sync::Arc;

/// Shared observation point handed to every independently loaded module.
#[derive(Debug, Clone)]
pub struct MountCoordinator {
    baseline: HostBaseline,
    resolver: DependencyResolver,
    reporter: Reporter,
}

impl MountCoordinator {
    pub fn new(baseline: HostBaseline, reporter: Reporter) -> Self {
        Self {
            baseline,
            resolver: DependencyResolver::new(),
            reporter,
        }
    }

    /// Build the registry, baseline and a tracing reporter from configuration.
    pub fn from_config(config: &ProvenanceConfig) -> ProvResult<Self> {
        let registry = Arc::new(ProvenanceRegistry::with_config(config)?);
        Ok(Self::new(HostBaseline::from_config(config)?, Reporter::new(registry)))
    }

    pub fn from_config_with_sink(config: &ProvenanceConfig, sink: Arc<dyn LogSink>) -> ProvResult<Self> {
        let registry = Arc::new(ProvenanceRegistry::with_config(config)?);
        Ok(Self::new(
            HostBaseline::from_config(config)?,
            Reporter::with_sink(registry, sink),
        ))
    }

    pub fn baseline(&self) -> &HostBaseline {
        &self.baseline
    }

    pub fn registry(&self) -> &Arc<ProvenanceRegistry> {
        self.reporter.registry()
    }

    /// Classify and report the version a module loader bound for a module.
    ///
    /// `timer` should have been started when the module began mounting.
    /// Never fails; malformed input yields an `Unknown` binding.
    pub fn mount(
        &self,
        module_name: &str,
        dependency_id: &str,
        resolved_version: &str,
        timer: &MountTimer,
    ) -> DependencyBinding {
        let expected = self.baseline.expected(dependency_id);
        let binding = self.resolver.resolve_lenient(
            module_name,
            dependency_id,
            resolved_version,
            expected.as_deref(),
        );
        let binding = timer.stamp(binding);
        self.reporter.report(binding.clone());
        binding
    }

    /// Like [`mount`](Self::mount), but first checks the bound build was
    /// published into `scope`. A missing slot is logged, not fatal.
    pub fn mount_from_scope(
        &self,
        scope: &SharedScope,
        module_name: &str,
        dependency_id: &str,
        resolved_version: &str,
        timer: &MountTimer,
    ) -> DependencyBinding {
        if let Err(e) = scope.require(dependency_id, resolved_version) {
            tracing::warn!(module = module_name, error = %e, "mounting without a published build");
        }
        self.mount(module_name, dependency_id, resolved_version, timer)
    }
}
