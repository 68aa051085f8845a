//! # Asset Index
//!
//! Content-addressed versions for static client assets. The index is built
//! once from the asset tree; clients send the versions they cached and get
//! back the ids that changed.

pub use updraft_core;

pub mod checker;
pub mod digest;
pub mod index;

pub use checker::{stale_assets, stale_assets_from_json, AssetVersion};
pub use digest::{blob_id, content_version, CONTENT_VERSION_LEN};
pub use index::{AssetIdMap, AssetIndex, AssetIndexEntry};

pub use updraft_core::{Result, UpdraftError};
