//! Reporter: makes resolution outcomes observable.

use crate::registry::ProvenanceRegistry;
use crate::types::DependencyBinding;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Write-only text stream receiving one line per reported binding.
///
/// `binding` is the value `line` was formatted from; text sinks ignore it.
pub trait LogSink: Send + Sync {
    fn write_line(&self, binding: &DependencyBinding, line: &str);
}

/// Forwards report lines to `tracing` at info level, with the binding's
/// fields attached to the same event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, binding: &DependencyBinding, line: &str) {
        tracing::info!(
            target: "depprov::report",
            module = %binding.module_name,
            dependency = %binding.dependency_id,
            version = %binding.resolved_version,
            source = binding.source.label(),
            elapsed_ms = binding.resolution_time_ms,
            fingerprint = %binding.fingerprint(),
            "{}",
            line
        );
    }
}

/// Keeps report lines in memory, for display layers and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, _binding: &DependencyBinding, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

/// Writes report lines to any `io::Write` stream, e.g. stderr.
#[derive(Debug)]
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, _binding: &DependencyBinding, line: &str) {
        let written = writeln!(
            self.writer.lock().unwrap_or_else(PoisonError::into_inner),
            "{}",
            line
        );
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write report line");
        }
    }
}

/// Format a binding as `[module] dependency version loaded from Source in Nms`,
/// e.g. `[mfe1] ui-toolkit 5.13.7 loaded from HostProvided in 12ms`.
pub fn format_report_line(binding: &DependencyBinding) -> String {
    format!(
        "[{}] {} {} loaded from {} in {}ms",
        binding.module_name,
        binding.dependency_id,
        binding.resolved_version,
        binding.source.label(),
        binding.resolution_time_ms
    )
}

/// Logs bindings and records them into the shared registry.
///
/// Every call is an independent event; re-mounts are recorded again
/// rather than deduplicated.
#[derive(Clone)]
pub struct Reporter {
    registry: Arc<ProvenanceRegistry>,
    sink: Arc<dyn LogSink>,
}

impl Reporter {
    /// Create a reporter that logs through `tracing`.
    pub fn new(registry: Arc<ProvenanceRegistry>) -> Self {
        Self::with_sink(registry, Arc::new(TracingSink))
    }

    pub fn with_sink(registry: Arc<ProvenanceRegistry>, sink: Arc<dyn LogSink>) -> Self {
        Self { registry, sink }
    }

    pub fn registry(&self) -> &Arc<ProvenanceRegistry> {
        &self.registry
    }

    pub fn report(&self, binding: DependencyBinding) {
        self.sink.write_line(&binding, &format_report_line(&binding));
        self.registry.record(binding);
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
