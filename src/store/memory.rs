use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SongStore, StoreError};
use crate::models::song::{INTERNAL_ID_FIELD, Song, song_id};

/// In-process stand-in for the document store. Keeps songs in insertion
/// order and stamps each with an `_id` the way the database would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    songs: RwLock<Vec<Song>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives `song` an `_id` unless the client supplied one, which is kept
    /// whatever its type.
    fn stamp(mut song: Song) -> (Value, Song) {
        let internal_id = song
            .entry(INTERNAL_ID_FIELD)
            .or_insert_with(|| Value::String(Uuid::new_v4().simple().to_string()))
            .clone();
        (internal_id, song)
    }

    fn duplicate_key(internal_id: &Value) -> StoreError {
        StoreError::DuplicateKey(internal_id_string(internal_id))
    }
}

fn internal_id_string(internal_id: &Value) -> String {
    match internal_id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn replace_all(&self, songs: Vec<Song>) -> Result<(), StoreError> {
        let mut stamped: Vec<Song> = Vec::with_capacity(songs.len());
        for song in songs {
            let (internal_id, song) = Self::stamp(song);
            if stamped.iter().any(|s| s.get(INTERNAL_ID_FIELD) == Some(&internal_id)) {
                return Err(Self::duplicate_key(&internal_id));
            }
            stamped.push(song);
        }
        *self.songs.write().await = stamped;
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.songs.read().await.len() as u64)
    }

    async fn find_all(&self) -> Result<Vec<Song>, StoreError> {
        Ok(self.songs.read().await.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Song>, StoreError> {
        Ok(self
            .songs
            .read()
            .await
            .iter()
            .find(|s| song_id(s) == Some(id))
            .cloned())
    }

    async fn insert(&self, song: Song) -> Result<String, StoreError> {
        let (internal_id, song) = Self::stamp(song);
        let mut songs = self.songs.write().await;
        if songs.iter().any(|s| s.get(INTERNAL_ID_FIELD) == Some(&internal_id)) {
            return Err(Self::duplicate_key(&internal_id));
        }
        songs.push(song);
        Ok(internal_id_string(&internal_id))
    }

    async fn update(&self, id: i64, fields: Song) -> Result<(), StoreError> {
        let mut songs = self.songs.write().await;
        if let Some(song) = songs.iter_mut().find(|s| song_id(s) == Some(id)) {
            for (key, value) in fields {
                song.insert(key, value);
            }
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let mut songs = self.songs.write().await;
        match songs.iter().position(|s| song_id(s) == Some(id)) {
            Some(index) => {
                songs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
