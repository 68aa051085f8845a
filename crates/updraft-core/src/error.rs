//! Error types for Updraft

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, UpdraftError>;

/// A single rejected field in a policy update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum UpdraftError {
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("Platform not found: {platform}")]
    PlatformNotFound { platform: String },

    #[error("Platform not supported: {platform}")]
    PlatformNotSupported { platform: String },

    #[error("Asset not found: {asset_id}")]
    AssetNotFound { asset_id: String },

    #[error("Invalid policy for {platform}: {} field error(s)", .errors.len())]
    Validation {
        platform: String,
        errors: Vec<FieldError>,
    },

    #[error("Asset file missing: {}", .path.display())]
    MissingAsset { path: PathBuf },

    #[error("Asset path escapes the asset root: {path}")]
    InvalidAssetPath { path: String },

    #[error("Failed to load policy file {}: {reason}", .path.display())]
    PolicyLoad { path: PathBuf, reason: String },

    #[error("Failed to persist policy file {}: {source}", .path.display())]
    PolicyPersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}

impl UpdraftError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable machine-readable code used in API error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidVersion { .. } => "invalid_version",
            Self::PlatformNotFound { .. } => "platform_not_found",
            Self::PlatformNotSupported { .. } => "platform_not_supported",
            Self::AssetNotFound { .. } => "asset_not_found",
            Self::Validation { .. } => "validation_error",
            Self::MissingAsset { .. } => "missing_asset",
            Self::InvalidAssetPath { .. } => "invalid_asset_path",
            Self::PolicyLoad { .. } => "policy_load_failed",
            Self::PolicyPersist { .. } => "policy_persist_failed",
            Self::Io { .. } => "io_error",
            Self::SerializationError { .. } => "invalid_json",
        }
    }
}
