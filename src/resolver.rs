//! Dependency resolver: classifies the build a module was bound to.
use crate::error::{ProvError, ProvResult};
use crate::types::{BindingSource, DependencyBinding};
use crate::version::Version;
use chrono::Utc;
use std::time::{Duration, Instant};

/// Classifies shared dependency bindings at mount time.
///
/// Resolution is synchronous and has no suspension point, so the latency a
/// caller measures around it is its own loading latency.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyResolver;

impl DependencyResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a binding, failing on malformed input.
    ///
    /// The returned binding carries `resolution_time_ms = 0`; apply the
    /// caller's measurement with [`MountTimer::stamp`].
    pub fn resolve(
        &self,
        module_name: &str,
        dependency_id: &str,
        resolved_version: &str,
        expected_host_version: Option<&str>,
    ) -> ProvResult<DependencyBinding> {
        if module_name.is_empty() {
            return Err(ProvError::Validation {
                field: "module_name".to_string(),
                message: "module name must be non-empty".to_string(),
            });
        }
        if dependency_id.is_empty() {
            return Err(ProvError::Validation {
                field: "dependency_id".to_string(),
                message: "dependency id must be non-empty".to_string(),
            });
        }
        Version::parse(resolved_version)?;

        Ok(self.build(
            module_name,
            dependency_id,
            resolved_version,
            expected_host_version,
            BindingSource::classify(resolved_version, expected_host_version),
        ))
    }

    /// Resolve a binding, recovering any failure as an `Unknown` source.
    ///
    /// Never fails: a module mount must not abort over provenance.
    pub fn resolve_lenient(
        &self,
        module_name: &str,
        dependency_id: &str,
        resolved_version: &str,
        expected_host_version: Option<&str>,
    ) -> DependencyBinding {
        match self.resolve(module_name, dependency_id, resolved_version, expected_host_version) {
            Ok(binding) => binding,
            Err(e) => {
                tracing::warn!(
                    module = module_name,
                    dependency = dependency_id,
                    error = %e,
                    "binding classified as unknown"
                );
                self.build(
                    module_name,
                    dependency_id,
                    resolved_version,
                    expected_host_version,
                    BindingSource::Unknown,
                )
            }
        }
    }

    fn build(
        &self,
        module_name: &str,
        dependency_id: &str,
        resolved_version: &str,
        expected_host_version: Option<&str>,
        source: BindingSource,
    ) -> DependencyBinding {
        DependencyBinding::new(
            module_name.to_string(),
            dependency_id.to_string(),
            resolved_version.to_string(),
            expected_host_version.map(str::to_string),
            source,
            0,
            Utc::now(),
        )
    }
}

/// Caller-side stopwatch started when a module begins mounting.
#[derive(Debug, Clone, Copy)]
pub struct MountTimer {
    started: Instant,
}

impl MountTimer {
    pub fn start() -> Self {
        Self { started: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Return `binding` carrying the time elapsed since the mount started.
    pub fn stamp(&self, binding: DependencyBinding) -> DependencyBinding {
        DependencyBinding {
            resolution_time_ms: self.elapsed_ms(),
            ..binding
        }
    }
}

impl Default for MountTimer {
    fn default() -> Self {
        Self::start()
    }
}
