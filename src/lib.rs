//! depprov - runtime dependency provenance
//!
//! Determines which copy of a shared dependency each independently loaded
//! module was bound to, classifies it against the host's baseline, and
//! records the outcome.

pub mod error;
pub mod config;
pub mod coordinator;
pub mod registry;
pub mod reporter;
pub mod resolver;
pub mod scope;
pub mod types;
pub mod version;

pub use error::{ProvError, ProvResult};
pub use config::{HostBaseline, ProvenanceConfig, DEFAULT_MAX_AUDIT_ENTRIES};
pub use coordinator::MountCoordinator;
pub use registry::{ProvenanceRegistry, RegistrySummary};
pub use reporter::{format_report_line, LogSink, MemorySink, Reporter, TracingSink, WriterSink};
pub use resolver::{DependencyResolver, MountTimer};
pub use scope::{SharedLibrary, SharedScope};
pub use types::{BindingSource, DependencyBinding};
pub use version::Version;
