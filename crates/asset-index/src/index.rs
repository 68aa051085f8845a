//! Asset index: external asset id to content version and path

use crate::digest::content_version_of_file;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use updraft_core::{Result, UpdraftError};
use walkdir::WalkDir;

/// Directories never indexed.
const SKIPPED_DIRS: &[&str] = &[".git"];

/// Asset id to path relative to the asset root, as supplied by the ids file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetIdMap(BTreeMap<String, String>);

impl AssetIdMap {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| UpdraftError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn insert(&mut self, id: impl Into<String>, relative_path: impl Into<String>) {
        self.0.insert(id.into(), relative_path.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(id, path)| (id.as_str(), path.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<I, P> FromIterator<(I, P)> for AssetIdMap
where
    I: Into<String>,
    P: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (I, P)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(id, path)| (id.into(), path.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIndexEntry {
    pub content_version: String,
    pub relative_path: String,
}

/// Immutable index built once from the asset tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetIndex {
    #[serde(skip)]
    root: PathBuf,
    entries: BTreeMap<String, AssetIndexEntry>,
}

impl AssetIndex {
    /// Walk `root` and digest the files named in `ids`.
    ///
    /// Fails without a partial result if any mapped path is missing or
    /// points outside `root`. Unreadable entries no id maps to are skipped.
    #[instrument(skip_all, fields(ids = ids.len()))]
    pub fn build(root: impl AsRef<Path>, ids: &AssetIdMap) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let files = list_files(&root);

        let mut entries = BTreeMap::new();
        for (id, mapped) in ids.iter() {
            let relative_path = normalize(mapped)?;
            let path = root.join(&relative_path);
            if !files.contains(&relative_path) || !path.is_file() {
                warn!("Asset '{}' maps to missing file {}", id, relative_path);
                return Err(UpdraftError::MissingAsset { path });
            }
            let content_version =
                content_version_of_file(&path).map_err(|e| UpdraftError::io(&path, e))?;
            debug!("{} -> {}", relative_path, content_version);
            entries.insert(
                id.to_string(),
                AssetIndexEntry {
                    content_version,
                    relative_path,
                },
            );
        }

        info!(
            "Indexed {} asset(s) out of {} file(s) under {}",
            entries.len(),
            files.len(),
            root.display()
        );
        Ok(Self { root, entries })
    }

    /// Load the ids file and build.
    pub fn build_from_ids_file(root: impl AsRef<Path>, ids_file: &Path) -> Result<Self> {
        let ids = AssetIdMap::load(ids_file)?;
        Self::build(root, &ids)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, id: &str) -> Option<&AssetIndexEntry> {
        self.entries.get(id)
    }

    /// Absolute path of an indexed asset.
    pub fn resolve(&self, id: &str) -> Option<(PathBuf, &AssetIndexEntry)> {
        self.entries
            .get(id)
            .map(|entry| (self.root.join(&entry.relative_path), entry))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetIndexEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Relative `/`-separated paths of the files under `root`.
fn list_files(root: &Path) -> BTreeSet<String> {
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
        });

    let mut files = BTreeSet::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map(slash_path)
            .unwrap_or_else(|_| slash_path(entry.path()));
        files.insert(relative);
    }
    files
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Canonical form of a mapped path; rejects anything leaving the root.
fn normalize(mapped: &str) -> Result<String> {
    let mut parts = Vec::new();
    for component in Path::new(mapped).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(UpdraftError::InvalidAssetPath {
                    path: mapped.to_string(),
                })
            }
        }
    }
    if parts.is_empty() {
        return Err(UpdraftError::InvalidAssetPath {
            path: mapped.to_string(),
        });
    }
    Ok(parts.join("/"))
}
