use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::song::HealthResponse;

pub struct RootController;

impl RootController {
    pub async fn health_check() -> Response {
        (StatusCode::OK, Json(HealthResponse { status: "OK" })).into_response()
    }
}
