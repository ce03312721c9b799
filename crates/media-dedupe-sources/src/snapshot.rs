use async_trait::async_trait;
use media_dedupe_models::{CatalogEntry, Library};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{CatalogSource, SourceError};

/// Id of the single library a snapshot file exposes
pub const SNAPSHOT_LIBRARY_ID: &str = "snapshot";

/// Catalog read from a JSON file holding an array of catalog entries
///
/// Deletions drop the entry from memory and rewrite the file.
pub struct SnapshotSource {
    path: PathBuf,
    entries: RwLock<Vec<CatalogEntry>>,
}

impl SnapshotSource {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let content = tokio::fs::read_to_string(&path).await?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&content)?;
        debug!("Snapshot: loaded {} entries from {}", entries.len(), path.display());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &[CatalogEntry]) -> Result<(), SourceError> {
        let content = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for SnapshotSource {
    fn source_name(&self) -> &str {
        "Snapshot"
    }

    async fn authenticate(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        true
    }

    async fn get_libraries(&self) -> Result<Vec<Library>, SourceError> {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| SNAPSHOT_LIBRARY_ID.to_string());

        Ok(vec![Library {
            id: SNAPSHOT_LIBRARY_ID.to_string(),
            name,
            collection_type: Some("movies".to_string()),
        }])
    }

    async fn get_movies(&self, library_id: &str) -> Result<Vec<CatalogEntry>, SourceError> {
        if library_id != SNAPSHOT_LIBRARY_ID {
            return Err(SourceError::NotFound(format!("library {}", library_id)));
        }
        Ok(self.entries.read().await.clone())
    }

    async fn delete_item(&self, id: &str) -> Result<(), SourceError> {
        let mut entries = self.entries.write().await;
        let position = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;

        entries.remove(position);
        self.persist(&entries).await?;
        info!("Snapshot: removed {} from {}", id, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_dedupe_models::{ExternalIds, MediaSource};
    use tempfile::tempdir;

    fn sample() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("a", "Heat")
                .with_external_ids(ExternalIds::new().with_tmdb("949"))
                .with_source(MediaSource::new(10, 100)),
            CatalogEntry::new("b", "Heat")
                .with_external_ids(ExternalIds::new().with_tmdb("949"))
                .with_source(MediaSource::new(20, 200)),
        ]
    }

    async fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("catalog.json");
        tokio::fs::write(&path, serde_json::to_string(&sample()).unwrap())
            .await
            .unwrap();
        path
    }

    #[tokio::test]
    async fn test_open_and_list() {
        let dir = tempdir().unwrap();
        let path = write_sample(dir.path()).await;

        let source = SnapshotSource::open(&path).await.unwrap();
        let libraries = source.get_libraries().await.unwrap();
        assert_eq!(libraries.len(), 1);
        assert_eq!(libraries[0].name, "catalog.json");
        assert!(libraries[0].is_movies());

        let movies = source.get_movies(SNAPSHOT_LIBRARY_ID).await.unwrap();
        assert_eq!(movies, sample());
    }

    #[tokio::test]
    async fn test_unknown_library() {
        let dir = tempdir().unwrap();
        let source = SnapshotSource::open(write_sample(dir.path()).await).await.unwrap();
        assert!(matches!(
            source.get_movies("other").await,
            Err(SourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_rewrites_file() {
        let dir = tempdir().unwrap();
        let path = write_sample(dir.path()).await;

        let source = SnapshotSource::open(&path).await.unwrap();
        source.delete_item("a").await.unwrap();

        let reopened = SnapshotSource::open(&path).await.unwrap();
        let movies = reopened.get_movies(SNAPSHOT_LIBRARY_ID).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, "b");

        assert!(matches!(
            source.delete_item("a").await,
            Err(SourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        tokio::fs::write(&path, "{not json").await.unwrap();
        assert!(matches!(
            SnapshotSource::open(&path).await,
            Err(SourceError::Json(_))
        ));
    }
}
