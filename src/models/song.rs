use serde::Serialize;
use serde_json::{Map, Value};

/// A song document: an open map of fields. Only `id` is interpreted.
pub type Song = Map<String, Value>;

pub const ID_FIELD: &str = "id";

/// Identifier the document store assigns to every stored song.
pub const INTERNAL_ID_FIELD: &str = "_id";

/// The client-assigned integer id of `song`, if it carries one.
pub fn song_id(song: &Song) -> Option<i64> {
    song.get(ID_FIELD).and_then(Value::as_i64)
}

#[derive(Serialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize, Clone, Debug)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Serialize, Clone, Debug)]
pub struct SongsResponse {
    pub songs: Vec<Song>,
}

#[derive(Serialize, Clone, Debug)]
pub struct InsertedResponse {
    pub inserted_id: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
