//! Pure status evaluation for both protocol versions

use serde::{Deserialize, Serialize};
use updraft_core::{PlatformPolicy, SemanticVersion};

/// Client verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    UpToDate,
    UpdateRequired,
}

/// V1 response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusV1 {
    pub status: VersionStatus,
}

/// V2 response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusV2 {
    pub status: VersionStatus,
    pub update_available: bool,
}

impl StatusV2 {
    const fn new(status: VersionStatus, update_available: bool) -> Self {
        Self {
            status,
            update_available,
        }
    }
}

/// V1: below the minimum or explicitly forced means update.
pub fn evaluate_v1(policy: &PlatformPolicy, version: &SemanticVersion) -> StatusV1 {
    let status = if *version < policy.minimal_actual_version
        || policy.force_update.contains(version)
    {
        VersionStatus::UpdateRequired
    } else {
        VersionStatus::UpToDate
    };
    StatusV1 { status }
}

/// V2: rules are checked in order and the first match wins.
///
/// Without a `latest_version` every comparison against it is false, so a
/// version below the minimum is required to update with nothing newer
/// advertised.
pub fn evaluate_v2(policy: &PlatformPolicy, version: &SemanticVersion) -> StatusV2 {
    use VersionStatus::{UpToDate, UpdateRequired};

    let latest = policy.latest_version.as_ref();
    let below_latest = latest.is_some_and(|latest| version < latest);
    let above_latest = latest.is_some_and(|latest| version > latest);

    if *version < policy.minimal_actual_version {
        return StatusV2::new(UpdateRequired, below_latest);
    }
    if above_latest {
        return StatusV2::new(UpToDate, false);
    }
    if policy.force_update.contains(version) {
        return StatusV2::new(UpdateRequired, true);
    }
    if policy.force_off.contains(version) {
        return StatusV2::new(UpdateRequired, false);
    }
    StatusV2::new(UpToDate, below_latest)
}
