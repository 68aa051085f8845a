pub use updraft_core;

mod engine;
pub mod evaluator;
pub mod store;
pub mod update;

pub use engine::{PolicyEngine, PolicyEngineStats, V2_UNSUPPORTED_PLATFORM};
pub use evaluator::{evaluate_v1, evaluate_v2, StatusV1, StatusV2, VersionStatus};
pub use store::{load, PolicyStore, VersionPolicyTable};
pub use update::{PendingUpdate, ValidatedUpdate};

// Re-export core types for convenience
pub use updraft_core::{PlatformPolicy, Result, SemanticVersion, UpdraftError};
