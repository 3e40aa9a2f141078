//! On-disk manifest files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use concur_core::{ApplicationRecord, CollectionPointRecord};

use crate::document::{ManifestApplication, ManifestCollectionPoint, ManifestDocument};
use crate::error::ManifestError;
use crate::locks::ManifestLocks;

/// Manifest files under a single directory, one per organisation.
///
/// Writes overwrite in place with no backup. Mutating methods do not lock;
/// callers hold [`ManifestStore::lock`] for the organisation around the
/// store mutation and the manifest write together.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    dir: PathBuf,
    locks: ManifestLocks,
}

impl ManifestStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: ManifestLocks::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Take the write lock for `org_id`.
    pub async fn lock(&self, org_id: &str) -> tokio::sync::OwnedMutexGuard<()> {
        self.locks.lock(org_id).await
    }

    /// `{dir}/{org_id}_applications.yaml`
    pub fn path_for(&self, org_id: &str) -> Result<PathBuf, ManifestError> {
        if org_id.is_empty()
            || org_id.contains(['/', '\\'])
            || org_id.contains("..")
        {
            return Err(ManifestError::InvalidOrgId(org_id.to_string()));
        }
        Ok(self.dir.join(format!("{org_id}_applications.yaml")))
    }

    /// Read and parse the organisation's manifest.
    pub async fn read(&self, org_id: &str) -> Result<ManifestDocument, ManifestError> {
        let path = self.path_for(org_id)?;
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(ManifestError::NotFound(path)),
            Err(source) => return Err(ManifestError::Io { path, source }),
        };
        ManifestDocument::from_yaml(&raw)
    }

    /// Serialize and overwrite the organisation's manifest.
    pub async fn write(&self, org_id: &str, doc: &ManifestDocument) -> Result<(), ManifestError> {
        let path = self.path_for(org_id)?;
        let yaml = doc.to_yaml()?;
        tokio::fs::write(&path, yaml)
            .await
            .map_err(|source| ManifestError::Io { path, source })?;
        tracing::debug!(org_id, applications = doc.applications.len(), "manifest written");
        Ok(())
    }

    /// Replace any existing manifest with one holding only `application`.
    pub async fn initialize(
        &self,
        org_id: &str,
        application: ManifestApplication,
    ) -> Result<ManifestDocument, ManifestError> {
        let doc = ManifestDocument::new(org_id, vec![application]);
        self.write(org_id, &doc).await?;
        Ok(doc)
    }

    /// Append a collection point under application `app_id`.
    ///
    /// The file is rewritten even when no application matches, in which case
    /// the content is unchanged and `false` is returned.
    pub async fn append_collection_point(
        &self,
        org_id: &str,
        app_id: &str,
        entry: ManifestCollectionPoint,
    ) -> Result<bool, ManifestError> {
        let mut doc = self.read(org_id).await?;
        let appended = doc.append_collection_point(app_id, entry);
        self.write(org_id, &doc).await?;
        Ok(appended)
    }

    /// Splice every entry with id `cp_id` out of the manifest. Returns the
    /// number of entries removed.
    pub async fn remove_collection_point(
        &self,
        org_id: &str,
        cp_id: &str,
    ) -> Result<usize, ManifestError> {
        let mut doc = self.read(org_id).await?;
        let removed = doc.remove_collection_point(cp_id);
        self.write(org_id, &doc).await?;
        Ok(removed)
    }

    /// Rewrite the manifest from store contents.
    pub async fn rebuild(
        &self,
        org_id: &str,
        applications: &[ApplicationRecord],
        collection_points: &[CollectionPointRecord],
    ) -> Result<ManifestDocument, ManifestError> {
        let doc = ManifestDocument::from_records(org_id, applications, collection_points);
        self.write(org_id, &doc).await?;
        Ok(doc)
    }
}
