//! # Updraft Core
//!
//! Core types shared by the Updraft services.
//!
//! ## Version checks
//! - Strict semantic versions with a total order
//! - Per-platform policy: minimal version, forced updates, forced-off versions, latest version
//!
//! ## Asset checks
//! - Content-addressed asset versions so clients re-download only what changed

pub mod error;
pub mod platform;
pub mod policy;
pub mod version;

pub use error::{FieldError, Result, UpdraftError};
pub use platform::{platform_key, Platform, PolicySchema};
pub use policy::PlatformPolicy;
pub use version::SemanticVersion;

/// Current Updraft version for compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Updraft build information for logs and the healthcheck
pub const BUILD_INFO: &str = concat!(
    "Updraft ",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_NAME"),
    ")"
);

/// Standard API endpoints for Updraft services
pub mod endpoints {
    pub const HEALTHCHECK: &str = "/healthcheck";
    pub const V1_STATUS: &str = "/v1/{platform}/{version}/status";
    pub const V2_STATUS: &str = "/v2/{platform}/{version}/status";
    pub const V1_CHECK_ASSETS: &str = "/v1/check_assets_updates";
    pub const V1_CHECK_ASSETS_LEGACY: &str = "/v1/check_updates";
    pub const V1_ASSET: &str = "/v1/assets/{*asset_id}";
    pub const V1_CONFIG: &str = "/v1/{platform}/config";

    /// Response header carrying the served asset's content version.
    pub const ASSET_VERSION_HEADER: &str = "x-asset-version";
}
