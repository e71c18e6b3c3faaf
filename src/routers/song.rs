use axum::{
    extract::{
        Json, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::Response,
};
use serde_json::Value;

use super::AppState;
use crate::controllers::SongController;
use crate::store::StoreError;

// A path id that is not an integer names no song, so it is a 404 rather than
// a malformed request.
type SongId = Result<Path<i64>, PathRejection>;
type Body = Result<Json<Value>, JsonRejection>;

fn body(payload: Body) -> Option<Value> {
    payload.ok().map(|Json(value)| value)
}

pub async fn count_route(State(store): State<AppState>) -> Result<Response, StoreError> {
    SongController::new(store).count().await
}

pub async fn list_songs_route(State(store): State<AppState>) -> Result<Response, StoreError> {
    SongController::new(store).list_songs().await
}

pub async fn get_song_route(
    State(store): State<AppState>,
    id: SongId,
) -> Result<Response, StoreError> {
    match id {
        Ok(Path(id)) => SongController::new(store).get_song(id).await,
        Err(_) => Ok(SongController::lookup_not_found()),
    }
}

pub async fn create_song_route(
    State(store): State<AppState>,
    payload: Body,
) -> Result<Response, StoreError> {
    SongController::new(store).create_song(body(payload)).await
}

pub async fn update_song_route(
    State(store): State<AppState>,
    id: SongId,
    payload: Body,
) -> Result<Response, StoreError> {
    match id {
        Ok(Path(id)) => SongController::new(store).update_song(id, body(payload)).await,
        Err(_) => Ok(SongController::not_found()),
    }
}

pub async fn delete_song_route(
    State(store): State<AppState>,
    id: SongId,
) -> Result<Response, StoreError> {
    match id {
        Ok(Path(id)) => SongController::new(store).delete_song(id).await,
        Err(_) => Ok(SongController::not_found()),
    }
}
