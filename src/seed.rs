use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::models::song::{Song, song_id};
use crate::store::{SongStore, StoreError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("could not read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("seed file is not a JSON array of songs: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("seed record {index} is not a JSON object")]
    NotAnObject { index: usize },
    #[error("seed record {index} has no integer id")]
    MissingId { index: usize },
    #[error("seed records share id {id}")]
    DuplicateId { id: i64 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub async fn load_songs(path: &Path) -> Result<Vec<Song>, SeedError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_songs(&raw)
}

pub fn parse_songs(raw: &str) -> Result<Vec<Song>, SeedError> {
    let records: Vec<Value> = serde_json::from_str(raw)?;
    let mut seen = HashSet::with_capacity(records.len());

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let Value::Object(song) = record else {
                return Err(SeedError::NotAnObject { index });
            };
            let id = song_id(&song).ok_or(SeedError::MissingId { index })?;
            if !seen.insert(id) {
                return Err(SeedError::DuplicateId { id });
            }
            Ok(song)
        })
        .collect()
}

/// Replaces the whole collection with `songs`.
pub async fn seed(store: &dyn SongStore, songs: Vec<Song>) -> Result<(), SeedError> {
    let total = songs.len();
    store.replace_all(songs).await?;
    info!("Seeded {} songs", total);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::io::Write;

    #[test]
    fn parses_songs_in_order() {
        let songs = parse_songs(r#"[{"id": 2, "title": "b"}, {"id": 1, "title": "a"}]"#).unwrap();
        let ids: Vec<_> = songs.iter().map(song_id).collect();
        assert_eq!(ids, vec![Some(2), Some(1)]);
        assert_eq!(songs[0]["title"], "b");
    }

    #[test]
    fn rejects_bad_records() {
        assert!(matches!(parse_songs(r#"{"id": 1}"#), Err(SeedError::Parse(_))));
        assert!(matches!(
            parse_songs(r#"[{"id": 1}, 3]"#),
            Err(SeedError::NotAnObject { index: 1 })
        ));
        assert!(matches!(
            parse_songs(r#"[{"title": "no id"}]"#),
            Err(SeedError::MissingId { index: 0 })
        ));
        assert!(matches!(
            parse_songs(r#"[{"id": "1"}]"#),
            Err(SeedError::MissingId { index: 0 })
        ));
        assert!(matches!(
            parse_songs(r#"[{"id": 4}, {"id": 4}]"#),
            Err(SeedError::DuplicateId { id: 4 })
        ));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_songs(&dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, SeedError::Read { .. }));
    }

    #[tokio::test]
    async fn seeding_replaces_the_collection() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1, "title": "A"}}, {{"id": 2, "title": "B"}}]"#).unwrap();

        let store = MemoryStore::new();
        store
            .insert(serde_json::json!({"id": 9}).as_object().cloned().unwrap())
            .await
            .unwrap();

        let songs = load_songs(file.path()).await.unwrap();
        seed(&store, songs).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        assert!(store.find_by_id(9).await.unwrap().is_none());
        assert_eq!(store.find_by_id(1).await.unwrap().unwrap()["title"], "A");
    }

    #[tokio::test]
    async fn bundled_dataset_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/songs.json");
        let songs = load_songs(&path).await.unwrap();
        assert!(!songs.is_empty());
    }
}
