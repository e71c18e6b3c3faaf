use async_trait::async_trait;
use thiserror::Error;

use crate::models::song::Song;

pub mod memory;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Driver(#[from] mongodb::error::Error),
    #[error("document could not be encoded: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[error("duplicate key: _id {0} already exists")]
    DuplicateKey(String),
}

/// The song collection, as seen by the route handlers.
///
/// Songs cross this boundary already mapped to plain JSON. Lookups go by the
/// client-assigned integer `id`, never by the store's own identifier.
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Drops every stored song and inserts `songs` as one batch.
    async fn replace_all(&self, songs: Vec<Song>) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    async fn find_all(&self) -> Result<Vec<Song>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Song>, StoreError>;

    /// Inserts `song` and returns the store-assigned identifier.
    async fn insert(&self, song: Song) -> Result<String, StoreError>;

    /// Sets each field of `fields` on the song with `id`. Fields not named are left alone.
    async fn update(&self, id: i64, fields: Song) -> Result<(), StoreError>;

    /// Returns how many songs were removed (0 or 1).
    async fn delete(&self, id: i64) -> Result<u64, StoreError>;
}
