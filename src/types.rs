//! Core data types for depprov.

use crate::error::{ProvError, ProvResult};
use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Where the copy of a shared dependency bound into a module came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BindingSource {
    /// The module received the host's canonical build.
    HostProvided,
    /// A host baseline exists but the module runs its own build.
    LocalFallback,
    /// No usable baseline, or the bound version could not be read.
    Unknown,
}

impl BindingSource {
    /// Classify a bound version against the host's declared version.
    ///
    /// Equality is exact: `5.13.7` and `5.13.7+build.2` are different builds.
    pub fn classify(resolved_version: &str, expected_host_version: Option<&str>) -> Self {
        let Some(expected) = expected_host_version else {
            return Self::Unknown;
        };
        match (Version::parse(resolved_version), Version::parse(expected)) {
            (Ok(resolved), Ok(host)) if resolved == host => Self::HostProvided,
            (Ok(_), Ok(_)) => Self::LocalFallback,
            _ => Self::Unknown,
        }
    }

    /// Parse a source label, returning an error for unknown values.
    pub fn from_str(s: &str) -> ProvResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "host_provided" | "hostprovided" | "host" | "container" => Ok(Self::HostProvided),
            "local_fallback" | "localfallback" | "local" => Ok(Self::LocalFallback),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ProvError::UnknownSource { value: s.to_string() }),
        }
    }

    /// Canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HostProvided => "host_provided",
            Self::LocalFallback => "local_fallback",
            Self::Unknown => "unknown",
        }
    }

    /// Label used in report lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HostProvided => "HostProvided",
            Self::LocalFallback => "LocalFallback",
            Self::Unknown => "Unknown",
        }
    }
}

impl Default for BindingSource {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for BindingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BindingSource {
    type Err = ProvError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}

/// One shared library as resolved for one consuming module.
///
/// Created once per mount and never mutated afterwards; a later mount of
/// the same module produces a new binding that supersedes this one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DependencyBinding {
    pub module_name: String,
    pub dependency_id: String,
    /// Raw version text as supplied by the module loader.
    pub resolved_version: String,
    pub expected_host_version: Option<String>,
    pub source: BindingSource,
    pub resolution_time_ms: u64,
    pub resolved_at: DateTime<Utc>,
}

impl DependencyBinding {
    pub fn new(
        module_name: String,
        dependency_id: String,
        resolved_version: String,
        expected_host_version: Option<String>,
        source: BindingSource,
        resolution_time_ms: u64,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            module_name,
            dependency_id,
            resolved_version,
            expected_host_version,
            source,
            resolution_time_ms,
            resolved_at,
        }
    }

    pub fn validate(&self) -> ProvResult<()> {
        if self.module_name.is_empty() {
            return Err(ProvError::Validation {
                field: "module_name".to_string(),
                message: "DependencyBinding must have a non-empty module name".to_string(),
            });
        }
        if self.dependency_id.is_empty() {
            return Err(ProvError::Validation {
                field: "dependency_id".to_string(),
                message: "DependencyBinding must have a non-empty dependency id".to_string(),
            });
        }
        let expected = BindingSource::classify(
            &self.resolved_version,
            self.expected_host_version.as_deref(),
        );
        if self.source != expected {
            return Err(ProvError::Validation {
                field: "source".to_string(),
                message: format!(
                    "source '{}' does not match versions (expected '{}')",
                    self.source, expected
                ),
            });
        }
        Ok(())
    }

    pub fn is_host_provided(&self) -> bool {
        self.source == BindingSource::HostProvided
    }

    /// SHA-256 over the binding's JSON form, used to tell remount entries apart.
    ///
    /// Struct serialization emits fields in declaration order, so equal
    /// bindings always hash to the same digest.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        if let Err(e) = serde_json::to_writer(HashWriter(&mut hasher), self) {
            tracing::warn!(error = %e, "binding fingerprint incomplete");
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Feeds serializer output straight into the digest.
struct HashWriter<'a>(&'a mut Sha256);

impl std::io::Write for HashWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
