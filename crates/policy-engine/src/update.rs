//! Configuration update path
//!
//! `PendingUpdate` (idle) is validated into a `ValidatedUpdate` or rejected
//! with field-tagged errors; `PolicyStore::apply` then persists it and swaps
//! the in-memory table.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::debug;
use updraft_core::{FieldError, Platform, PlatformPolicy, Result, SemanticVersion, UpdraftError};

const MISSING: &str = "Missing data for required field.";
const NULL: &str = "Field may not be null.";
const NOT_SEMVER: &str = "Not a valid semver value.";
const NOT_LIST: &str = "Not a valid list.";
const UNKNOWN: &str = "Unknown field.";
const NOT_OBJECT: &str = "Invalid input type.";

/// An update payload that has not been checked yet.
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    platform: Platform,
    payload: Value,
}

/// An update that passed its platform schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpdate {
    platform: Platform,
    policy: PlatformPolicy,
}

impl ValidatedUpdate {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn policy(&self) -> &PlatformPolicy {
        &self.policy
    }

    pub fn into_parts(self) -> (Platform, PlatformPolicy) {
        (self.platform, self.policy)
    }
}

impl PendingUpdate {
    /// Only platforms with a known schema accept updates.
    pub fn new(platform: &str, payload: Value) -> Result<Self> {
        let platform = platform
            .parse::<Platform>()
            .map_err(|platform| UpdraftError::PlatformNotFound { platform })?;
        Ok(Self { platform, payload })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn validate(self) -> Result<ValidatedUpdate> {
        debug!(platform = %self.platform, "Validating policy update");
        let schema = self.platform.schema();

        let Value::Object(fields) = &self.payload else {
            return Err(self.reject(vec![FieldError::new("_schema", NOT_OBJECT)]));
        };

        let mut errors = Vec::new();
        for name in fields.keys() {
            if !schema.required_fields().contains(&name.as_str()) {
                errors.push(FieldError::new(name.as_str(), UNKNOWN));
            }
        }

        let minimal = version_field(fields, "minimal_actual_version", &mut errors);
        let force_update = list_field(fields, "force_update", &mut errors);
        let (latest, force_off) = if schema.required_fields().contains(&"latest_version") {
            (
                version_field(fields, "latest_version", &mut errors),
                list_field(fields, "force_off", &mut errors),
            )
        } else {
            (None, Some(BTreeSet::new()))
        };

        if !errors.is_empty() {
            return Err(self.reject(errors));
        }

        match (minimal, force_update, force_off) {
            (Some(minimal), Some(force_update), Some(force_off)) => {
                let policy = PlatformPolicy {
                    minimal_actual_version: minimal,
                    force_update,
                    latest_version: latest,
                    force_off,
                };
                Ok(ValidatedUpdate {
                    platform: self.platform,
                    policy,
                })
            }
            // every None above pushed an error
            _ => Err(self.reject(vec![FieldError::new("_schema", NOT_OBJECT)])),
        }
    }

    fn reject(&self, errors: Vec<FieldError>) -> UpdraftError {
        debug!(platform = %self.platform, errors = errors.len(), "Policy update rejected");
        UpdraftError::Validation {
            platform: self.platform.to_string(),
            errors,
        }
    }
}

fn required<'a>(
    fields: &'a Map<String, Value>,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a Value> {
    match fields.get(name) {
        None => {
            errors.push(FieldError::new(name, MISSING));
            None
        }
        Some(Value::Null) => {
            errors.push(FieldError::new(name, NULL));
            None
        }
        Some(value) => Some(value),
    }
}

fn parse_version(value: &Value) -> Option<SemanticVersion> {
    value
        .as_str()
        .and_then(|raw| SemanticVersion::parse(raw).ok())
}

fn version_field(
    fields: &Map<String, Value>,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<SemanticVersion> {
    let value = required(fields, name, errors)?;
    let parsed = parse_version(value);
    if parsed.is_none() {
        errors.push(FieldError::new(name, NOT_SEMVER));
    }
    parsed
}

fn list_field(
    fields: &Map<String, Value>,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<BTreeSet<SemanticVersion>> {
    let value = required(fields, name, errors)?;
    let Some(items) = value.as_array() else {
        errors.push(FieldError::new(name, NOT_LIST));
        return None;
    };

    let before = errors.len();
    let mut versions = BTreeSet::new();
    for (index, item) in items.iter().enumerate() {
        match parse_version(item) {
            Some(version) => {
                versions.insert(version);
            }
            None => errors.push(FieldError::new(format!("{name}.{index}"), NOT_SEMVER)),
        }
    }
    (errors.len() == before).then_some(versions)
}
