//! Policy Engine Implementation
//!
//! The service object handlers talk to: resolves a platform's policy from the
//! current snapshot, parses the client version and runs the evaluator.

use crate::evaluator::{evaluate_v1, evaluate_v2, StatusV1, StatusV2};
use crate::store::{PolicyStore, VersionPolicyTable};
use crate::update::PendingUpdate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};
use updraft_core::{Platform, PlatformPolicy, Result, SemanticVersion, UpdraftError};

/// Platform that the V2 status protocol refuses outright.
///
/// Its policy carries no `latest_version`, so V2 has nothing to nudge
/// towards. Kept as a product rule even when a policy exists.
pub const V2_UNSUPPORTED_PLATFORM: Platform = Platform::Android;

/// Shared handle over the policy store; cheap to clone.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    store: Arc<PolicyStore>,
}

impl PolicyEngine {
    pub fn new(store: PolicyStore) -> Self {
        info!("Initializing Updraft policy engine");
        Self {
            store: Arc::new(store),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        PolicyStore::open(path).map(Self::new)
    }

    pub fn snapshot(&self) -> Arc<VersionPolicyTable> {
        self.store.snapshot()
    }

    fn resolve(&self, platform: &str, version: &str) -> Result<(PlatformPolicy, SemanticVersion)> {
        let version = SemanticVersion::parse(version)?;
        let policy = self.store.get(platform)?;
        Ok((policy, version))
    }

    #[instrument(skip(self))]
    pub fn status_v1(&self, platform: &str, version: &str) -> Result<StatusV1> {
        let (policy, version) = self.resolve(platform, version)?;
        Ok(evaluate_v1(&policy, &version))
    }

    #[instrument(skip(self))]
    pub fn status_v2(&self, platform: &str, version: &str) -> Result<StatusV2> {
        if platform.parse::<Platform>() == Ok(V2_UNSUPPORTED_PLATFORM) {
            return Err(UpdraftError::PlatformNotSupported {
                platform: platform.to_string(),
            });
        }
        let (policy, version) = self.resolve(platform, version)?;
        Ok(evaluate_v2(&policy, &version))
    }

    /// Current policy of a platform with an update schema.
    pub fn config(&self, platform: &str) -> Result<PlatformPolicy> {
        let platform = platform
            .parse::<Platform>()
            .map_err(|platform| UpdraftError::PlatformNotFound { platform })?;
        self.store.get(platform.as_str())
    }

    /// Validate, persist and swap in a new policy for `platform`.
    #[instrument(skip(self, payload))]
    pub fn update_config(&self, platform: &str, payload: serde_json::Value) -> Result<PlatformPolicy> {
        let validated = PendingUpdate::new(platform, payload)?.validate()?;
        self.store.apply(validated)
    }

    pub fn get_stats(&self) -> PolicyEngineStats {
        let snapshot = self.snapshot();
        PolicyEngineStats {
            total_platforms: snapshot.len(),
            platforms: snapshot.platforms().map(str::to_string).collect(),
        }
    }
}

/// Engine statistics for the healthcheck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEngineStats {
    pub total_platforms: usize,
    pub platforms: Vec<String>,
}
