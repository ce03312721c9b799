use async_trait::async_trait;
use media_dedupe_models::{CatalogEntry, Library};

use crate::SourceError;

/// Where catalog snapshots come from and where deletions go
///
/// The duplicate engine only ever sees the `Vec<CatalogEntry>` returned by
/// [`CatalogSource::get_movies`]; everything fallible lives behind this trait.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    // Source metadata
    fn source_name(&self) -> &str;

    // Authentication
    async fn authenticate(&mut self) -> Result<(), SourceError>;
    fn is_authenticated(&self) -> bool;

    // Data retrieval
    async fn get_libraries(&self) -> Result<Vec<Library>, SourceError>;
    async fn get_movies(&self, library_id: &str) -> Result<Vec<CatalogEntry>, SourceError>;

    // Data modification
    async fn delete_item(&self, id: &str) -> Result<(), SourceError>;

    /// Poster URL for an entry, when the source serves images
    fn image_url(&self, _entry: &CatalogEntry) -> Option<String> {
        None
    }
}
