pub mod error;
pub mod factory;
pub mod jellyfin;
pub mod snapshot;
pub mod traits;

pub use error::SourceError;
pub use factory::{create_server_source, create_source};
pub use jellyfin::{AuthSession, ClientIdentity, JellyfinClient};
pub use snapshot::SnapshotSource;
pub use traits::CatalogSource;
