use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::store::SongStore;

pub mod root;
pub mod song;

pub use root::health_check_route;
pub use song::{
    count_route, create_song_route, delete_song_route, get_song_route, list_songs_route,
    update_song_route,
};

/// Shared by every handler; the store handle is built once at startup.
pub type AppState = Arc<dyn SongStore>;

pub fn app(store: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check_route))
        .route("/count", get(count_route))
        .route("/song", get(list_songs_route).post(create_song_route))
        .route(
            "/song/{id}",
            get(get_song_route)
                .put(update_song_route)
                .delete(delete_song_route),
        )
        .layer(cors)
        // 5xx responses are not logged here; handlers decide what is worth an ERROR
        .layer(TraceLayer::new_for_http().on_failure(()))
        .with_state(store)
}
