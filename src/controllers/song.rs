use std::sync::Arc;

use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::error;

use crate::{
    models::song::{
        CountResponse, ID_FIELD, INTERNAL_ID_FIELD, InsertedResponse, MessageResponse, Song,
        SongsResponse,
    },
    store::{SongStore, StoreError},
};

const NOT_FOUND_BY_ID: &str = "song with id not found";
const NOT_FOUND: &str = "song not found";
const NOT_AN_OBJECT: &str = "request body must be a JSON object";
const ID_REQUIRED: &str = "Song ID is required";
const ID_NOT_INTEGER: &str = "Song ID must be an integer";

/// Store failures that are not handled by an endpoint surface as a bare 500.
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        message(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

fn message(status: StatusCode, text: impl Into<String>) -> Response {
    (status, Json(MessageResponse::new(text))).into_response()
}

fn already_present(id: i64) -> Response {
    // 302 is what existing clients expect for a duplicate id, even though it
    // is a redirect code.
    message(StatusCode::FOUND, format!("song with id {} already present", id))
}

/// Field equality as clients see it: numbers compare by value, so `1` and
/// `1.0` are the same.
fn values_match(current: &Value, incoming: &Value) -> bool {
    match (current, incoming) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => a.as_f64() == b.as_f64(),
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_match(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(k, v)| b.get(k).is_some_and(|w| values_match(v, w)))
        }
        _ => current == incoming,
    }
}

/// True when applying `fields` to `existing` would change nothing. A field
/// the song lacks counts as null.
fn already_applied(existing: &Song, fields: &Song) -> bool {
    fields
        .iter()
        .all(|(key, value)| values_match(existing.get(key).unwrap_or(&Value::Null), value))
}

pub struct SongController {
    store: Arc<dyn SongStore>,
}

impl SongController {
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        SongController { store }
    }

    pub async fn count(&self) -> Result<Response, StoreError> {
        let count = self.store.count().await?;
        Ok((StatusCode::OK, Json(CountResponse { count })).into_response())
    }

    pub async fn list_songs(&self) -> Result<Response, StoreError> {
        let songs = self.store.find_all().await?;
        Ok((StatusCode::OK, Json(SongsResponse { songs })).into_response())
    }

    pub async fn get_song(&self, id: i64) -> Result<Response, StoreError> {
        match self.store.find_by_id(id).await? {
            Some(song) => Ok((StatusCode::OK, Json(song)).into_response()),
            None => Ok(message(StatusCode::NOT_FOUND, NOT_FOUND_BY_ID)),
        }
    }

    pub async fn create_song(&self, payload: Option<Value>) -> Result<Response, StoreError> {
        let Some(Value::Object(song)) = payload else {
            return Ok(message(StatusCode::BAD_REQUEST, NOT_AN_OBJECT));
        };
        let id = match song.get(ID_FIELD) {
            None => return Ok(message(StatusCode::BAD_REQUEST, ID_REQUIRED)),
            Some(raw) => match raw.as_i64() {
                Some(id) => id,
                None => return Ok(message(StatusCode::BAD_REQUEST, ID_NOT_INTEGER)),
            },
        };

        // Not atomic with the insert below: two concurrent creates with the
        // same id can both pass this check.
        if self.store.find_by_id(id).await?.is_some() {
            return Ok(already_present(id));
        }

        match self.store.insert(song).await {
            Ok(inserted_id) => {
                Ok((StatusCode::CREATED, Json(InsertedResponse { inserted_id })).into_response())
            }
            Err(e) => {
                error!("Insertion error: {}", e);
                Ok(message(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while inserting the song",
                ))
            }
        }
    }

    pub async fn update_song(
        &self,
        id: i64,
        payload: Option<Value>,
    ) -> Result<Response, StoreError> {
        let Some(Value::Object(mut fields)) = payload else {
            return Ok(message(StatusCode::BAD_REQUEST, NOT_AN_OBJECT));
        };
        // the store owns _id
        fields.remove(INTERNAL_ID_FIELD);

        let Some(existing) = self.store.find_by_id(id).await? else {
            return Ok(message(StatusCode::NOT_FOUND, NOT_FOUND));
        };

        let target_id = match fields.get(ID_FIELD) {
            None => id,
            Some(raw) => match raw.as_i64() {
                Some(new_id) => new_id,
                None => return Ok(message(StatusCode::BAD_REQUEST, ID_NOT_INTEGER)),
            },
        };

        if already_applied(&existing, &fields) {
            return Ok(message(StatusCode::OK, "song found, but nothing updated"));
        }

        if target_id != id && self.store.find_by_id(target_id).await?.is_some() {
            return Ok(already_present(target_id));
        }

        self.store.update(id, fields).await?;

        match self.store.find_by_id(target_id).await? {
            Some(song) => Ok((StatusCode::CREATED, Json(song)).into_response()),
            // deleted between the write and the re-read
            None => Ok(message(StatusCode::NOT_FOUND, NOT_FOUND)),
        }
    }

    pub async fn delete_song(&self, id: i64) -> Result<Response, StoreError> {
        if self.store.delete(id).await? == 0 {
            return Ok(message(StatusCode::NOT_FOUND, NOT_FOUND));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// 404 for a GET whose path id cannot name a song.
    pub fn lookup_not_found() -> Response {
        message(StatusCode::NOT_FOUND, NOT_FOUND_BY_ID)
    }

    /// 404 for a PUT or DELETE whose path id cannot name a song.
    pub fn not_found() -> Response {
        message(StatusCode::NOT_FOUND, NOT_FOUND)
    }
}
