use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// Cohort-specific willingness-to-pay override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CohortPolicy {
    pub threshold: f64,
}

/// Immutable cost-effectiveness policy document.
///
/// Loaded once per process and replaced wholesale on an explicit reload, so
/// concurrent evaluations always observe a consistent version/threshold pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub version: String,
    pub threshold: f64,
    #[serde(default)]
    pub cohorts: BTreeMap<String, CohortPolicy>,
    pub updated_at: String,
    #[serde(default)]
    pub notes: String,
}

impl Policy {
    /// Cohort override when one exists, otherwise the policy default.
    /// An unknown cohort name falls through to the default rather than failing.
    pub fn threshold_for(&self, cohort: Option<&str>) -> f64 {
        cohort
            .and_then(|name| self.cohorts.get(name))
            .map(|cohort| cohort.threshold)
            .unwrap_or(self.threshold)
    }
}

/// Error enumeration for policy lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("policy document not found at {path}")]
    NotFound { path: String },
    #[error("policy document could not be parsed: {reason}")]
    Corrupt { reason: String },
    #[error("policy source unavailable: {0}")]
    Unavailable(String),
}

/// Source abstraction so the evaluation service can be exercised in isolation.
pub trait PolicySource: Send + Sync {
    fn load(&self) -> Result<Policy, PolicyError>;
}

/// Reads the policy document from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FilePolicySource {
    path: PathBuf,
}

impl FilePolicySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PolicySource for FilePolicySource {
    fn load(&self) -> Result<Policy, PolicyError> {
        if !self.path.exists() {
            return Err(PolicyError::NotFound {
                path: self.path.display().to_string(),
            });
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|err| PolicyError::Unavailable(err.to_string()))?;

        serde_json::from_str(&raw).map_err(|err| PolicyError::Corrupt {
            reason: err.to_string(),
        })
    }
}

/// Fixed in-memory policy, used by tests and one-shot CLI runs.
#[derive(Debug, Clone)]
pub struct InMemoryPolicySource {
    policy: Policy,
}

impl InMemoryPolicySource {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }
}

impl PolicySource for InMemoryPolicySource {
    fn load(&self) -> Result<Policy, PolicyError> {
        Ok(self.policy.clone())
    }
}

/// Read-through cache over a policy source.
///
/// The first `current` call loads from the source; later calls share the
/// cached `Arc`. `reload` swaps the whole object, so readers never see a
/// partially updated document.
pub struct PolicyStore<S> {
    source: S,
    cached: RwLock<Option<Arc<Policy>>>,
}

impl<S: PolicySource> PolicyStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: RwLock::new(None),
        }
    }

    pub fn current(&self) -> Result<Arc<Policy>, PolicyError> {
        if let Some(policy) = self
            .cached
            .read()
            .expect("policy cache poisoned")
            .as_ref()
            .cloned()
        {
            return Ok(policy);
        }

        self.reload()
    }

    /// Explicit invalidation: re-read the source and replace the cached copy.
    pub fn reload(&self) -> Result<Arc<Policy>, PolicyError> {
        let fresh = Arc::new(self.source.load()?);
        *self.cached.write().expect("policy cache poisoned") = Some(fresh.clone());
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn sample_policy() -> Policy {
        let mut cohorts = BTreeMap::new();
        cohorts.insert("elderly".to_string(), CohortPolicy { threshold: 36000.0 });
        cohorts.insert(
            "low_income".to_string(),
            CohortPolicy { threshold: 40000.0 },
        );
        Policy {
            version: "2025-08".to_string(),
            threshold: 37446.0,
            cohorts,
            updated_at: "2025-08-16T11:38:00Z".to_string(),
            notes: "test policy".to_string(),
        }
    }

    struct CountingSource {
        loads: AtomicUsize,
        policy: Mutex<Policy>,
    }

    impl CountingSource {
        fn new(policy: Policy) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                policy: Mutex::new(policy),
            }
        }

        fn swap(&self, policy: Policy) {
            *self.policy.lock().expect("policy mutex poisoned") = policy;
        }
    }

    impl PolicySource for &CountingSource {
        fn load(&self) -> Result<Policy, PolicyError> {
            self.loads.fetch_add(1, Ordering::Relaxed);
            Ok(self.policy.lock().expect("policy mutex poisoned").clone())
        }
    }

    #[test]
    fn cohort_override_wins_over_default() {
        let policy = sample_policy();
        assert_eq!(policy.threshold_for(Some("elderly")), 36000.0);
        assert_eq!(policy.threshold_for(Some("low_income")), 40000.0);
    }

    #[test]
    fn unknown_cohort_falls_through_to_default() {
        let policy = sample_policy();
        assert_eq!(policy.threshold_for(Some("pediatric")), 37446.0);
        assert_eq!(policy.threshold_for(None), 37446.0);
    }

    #[test]
    fn store_reads_source_once_until_reload() {
        let source = CountingSource::new(sample_policy());
        let store = PolicyStore::new(&source);

        let first = store.current().expect("policy loads");
        let second = store.current().expect("policy cached");
        assert_eq!(source.loads.load(Ordering::Relaxed), 1);
        assert_eq!(first.version, second.version);

        let mut updated = sample_policy();
        updated.version = "2025-09".to_string();
        source.swap(updated);

        // Still cached: the swap is only visible after an explicit reload.
        let cached = store.current().expect("policy cached");
        assert_eq!(cached.version, "2025-08");

        let reloaded = store.reload().expect("policy reloads");
        assert_eq!(reloaded.version, "2025-09");
        assert_eq!(source.loads.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn file_source_exposes_its_configured_path() {
        let source = FilePolicySource::new("policies/icer/2025-08.json");
        assert_eq!(source.path(), Path::new("policies/icer/2025-08.json"));
    }

    #[test]
    fn file_source_reports_missing_document() {
        let source = FilePolicySource::new("/nonexistent/icer/policy.json");
        match source.load() {
            Err(PolicyError::NotFound { path }) => assert!(path.contains("policy.json")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn file_source_round_trips_policy_document() {
        let path = std::env::temp_dir().join("icer-policy-roundtrip.json");
        let raw = serde_json::to_string(&sample_policy()).expect("policy serializes");
        fs::write(&path, raw).expect("policy file written");

        let source = FilePolicySource::new(&path);
        let policy = source.load().expect("policy parses");
        assert_eq!(policy, sample_policy());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn file_source_flags_corrupt_document() {
        let path = std::env::temp_dir().join("icer-policy-corrupt.json");
        fs::write(&path, "{\"version\": \"2025-08\"").expect("file written");

        let source = FilePolicySource::new(&path);
        match source.load() {
            Err(PolicyError::Corrupt { .. }) => {}
            other => panic!("expected Corrupt, got {other:?}"),
        }

        fs::remove_file(&path).ok();
    }
}
