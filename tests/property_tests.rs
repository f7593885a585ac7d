//! Property tests for classification and registry ordering.

use depprov::{BindingSource, DependencyResolver, ProvenanceRegistry};
use proptest::prelude::*;

fn version_strategy() -> impl Strategy<Value = String> {
    (0u64..50, 0u64..50, 0u64..50).prop_map(|(major, minor, patch)| format!("{}.{}.{}", major, minor, patch))
}

proptest! {
    #[test]
    fn equal_versions_are_host_provided(version in version_strategy()) {
        let b = DependencyResolver::new()
            .resolve("mfe", "ui-toolkit", &version, Some(&version))
            .expect("valid version");
        prop_assert_eq!(b.source, BindingSource::HostProvided);
    }

    #[test]
    fn differing_versions_are_local_fallback(a in version_strategy(), b in version_strategy()) {
        prop_assume!(a != b);
        let binding = DependencyResolver::new()
            .resolve("mfe", "ui-toolkit", &a, Some(&b))
            .expect("valid version");
        prop_assert_eq!(binding.source, BindingSource::LocalFallback);
    }

    #[test]
    fn missing_baseline_is_unknown(version in "\\PC*") {
        let b = DependencyResolver::new().resolve_lenient("mfe", "ui-toolkit", &version, None);
        prop_assert_eq!(b.source, BindingSource::Unknown);
    }

    #[test]
    fn audit_log_never_exceeds_capacity(capacity in 1usize..20, count in 0usize..60) {
        let registry = ProvenanceRegistry::with_capacity(capacity);
        let resolver = DependencyResolver::new();
        for i in 0..count {
            registry.record(resolver.resolve_lenient(&format!("mfe{}", i), "ui-toolkit", "1.0.0", None));
        }

        prop_assert_eq!(registry.len(), count.min(capacity));
        let names: Vec<String> = registry.all().into_iter().map(|b| b.module_name).collect();
        let expected: Vec<String> = (count.saturating_sub(capacity)..count).map(|i| format!("mfe{}", i)).collect();
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn current_matches_latest_log_entry(
        capacity in 1usize..10,
        mounts in prop::collection::vec((0usize..4, version_strategy()), 0..40),
    ) {
        let registry = ProvenanceRegistry::with_capacity(capacity);
        let resolver = DependencyResolver::new();
        for (module, version) in &mounts {
            registry.record(resolver.resolve_lenient(&format!("mfe{}", module), "ui-toolkit", version, Some("1.0.0")));
        }

        let log = registry.all();
        for module in 0..4 {
            let name = format!("mfe{}", module);
            let latest = log.iter().rev().find(|b| b.module_name == name).cloned();
            prop_assert_eq!(registry.current(&name), latest);
        }
    }
}
