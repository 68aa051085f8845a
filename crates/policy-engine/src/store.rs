//! Version policy table backed by a JSON file
//!
//! Readers clone an `Arc` snapshot under a short read lock and evaluate
//! against it without holding any lock. Writers are serialized and swap in a
//! whole new table only after it has been written to disk.

use crate::update::ValidatedUpdate;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use updraft_core::{platform_key, PlatformPolicy, Result, UpdraftError};

/// Platform name (lowercase) to policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPolicyTable {
    platforms: BTreeMap<String, PlatformPolicy>,
}

impl VersionPolicyTable {
    /// Parse a whole table. Any bad platform entry, or two platform names
    /// differing only in case, fails the whole parse.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let parsed: BTreeMap<String, PlatformPolicy> = serde_json::from_str(raw)?;
        let mut platforms = BTreeMap::new();
        for (name, policy) in parsed {
            let key = platform_key(&name);
            if platforms.contains_key(&key) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate platform '{key}' (names differ only in case)"
                )));
            }
            platforms.insert(key, policy);
        }
        Ok(Self { platforms })
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.platforms)
    }

    /// Case-insensitive lookup.
    pub fn get(&self, platform: &str) -> Option<&PlatformPolicy> {
        self.platforms.get(&platform_key(platform))
    }

    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.platforms.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Copy of this table with one platform replaced.
    pub fn with_policy(&self, platform: &str, policy: PlatformPolicy) -> Self {
        let mut platforms = self.platforms.clone();
        platforms.insert(platform_key(platform), policy);
        Self { platforms }
    }
}

/// Read and parse a policy file.
pub fn load(path: &Path) -> Result<VersionPolicyTable> {
    let raw = fs::read_to_string(path).map_err(|e| UpdraftError::PolicyLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    VersionPolicyTable::from_json(&raw).map_err(|e| UpdraftError::PolicyLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write `table` next to `path` and rename it into place.
fn persist(path: &Path, table: &VersionPolicyTable) -> Result<()> {
    let body = table.to_json_pretty()?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "policy.json".to_string());
    let tmp_path = dir.join(format!(".{file_name}.tmp"));

    let write = || -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(body.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    };

    write().map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        UpdraftError::PolicyPersist {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// File-backed, atomically swappable policy table.
pub struct PolicyStore {
    path: PathBuf,
    current: RwLock<Arc<VersionPolicyTable>>,
    writer: Mutex<()>,
}

impl std::fmt::Debug for PolicyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyStore")
            .field("path", &self.path)
            .field("platforms", &self.current.read().len())
            .finish()
    }
}

impl PolicyStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let table = load(&path)?;
        info!(
            "Loaded version policy from {} for {} platform(s): {}",
            path.display(),
            table.len(),
            table.platforms().collect::<Vec<_>>().join(", ")
        );
        Ok(Self {
            path,
            current: RwLock::new(Arc::new(table)),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current immutable table.
    pub fn snapshot(&self) -> Arc<VersionPolicyTable> {
        self.current.read().clone()
    }

    pub fn get(&self, platform: &str) -> Result<PlatformPolicy> {
        self.snapshot()
            .get(platform)
            .cloned()
            .ok_or_else(|| UpdraftError::PlatformNotFound {
                platform: platform.to_string(),
            })
    }

    /// Persist a table with `platform` replaced, then swap it in.
    ///
    /// On a failed write the in-memory table is left untouched.
    #[instrument(skip(self, policy), fields(path = %self.path.display()))]
    pub fn replace(&self, platform: &str, policy: PlatformPolicy) -> Result<Arc<VersionPolicyTable>> {
        let _guard = self.writer.lock();
        let next = Arc::new(self.snapshot().with_policy(platform, policy));

        debug!("Persisting policy table");
        persist(&self.path, &next)?;

        *self.current.write() = Arc::clone(&next);
        info!("Policy for '{}' replaced", platform_key(platform));
        Ok(next)
    }

    /// Final step of a validated configuration update.
    pub fn apply(&self, update: ValidatedUpdate) -> Result<PlatformPolicy> {
        let (platform, policy) = update.into_parts();
        self.replace(platform.as_str(), policy.clone())?;
        Ok(policy)
    }
}
