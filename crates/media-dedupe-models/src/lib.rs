pub mod catalog_entry;
pub mod external_ids;
pub mod identity_group;
pub mod library;
pub mod media_source;

pub use catalog_entry::CatalogEntry;
pub use external_ids::ExternalIds;
pub use identity_group::IdentityGroup;
pub use library::Library;
pub use media_source::{MediaSource, VideoStream};
