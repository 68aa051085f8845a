//! Per-platform version policy

use crate::version::SemanticVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Rules deciding whether a client version must (or may) update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformPolicy {
    pub minimal_actual_version: SemanticVersion,
    #[serde(default)]
    pub force_update: BTreeSet<SemanticVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<SemanticVersion>,
    #[serde(default)]
    pub force_off: BTreeSet<SemanticVersion>,
}

impl PlatformPolicy {
    pub fn new(minimal_actual_version: SemanticVersion) -> Self {
        Self {
            minimal_actual_version,
            force_update: BTreeSet::new(),
            latest_version: None,
            force_off: BTreeSet::new(),
        }
    }

    pub fn with_latest(mut self, latest: SemanticVersion) -> Self {
        self.latest_version = Some(latest);
        self
    }

    pub fn with_force_update(mut self, versions: impl IntoIterator<Item = SemanticVersion>) -> Self {
        self.force_update.extend(versions);
        self
    }

    pub fn with_force_off(mut self, versions: impl IntoIterator<Item = SemanticVersion>) -> Self {
        self.force_off.extend(versions);
        self
    }
}
