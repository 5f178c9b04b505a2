// Webhook the database calls after a row changes. Feeds the in-process change feed so
// watchers get push notifications between polls.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::modules::sync::core::events::ChangeNotification;
use crate::modules::sync::core::resource::Timestamp;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct ChangeBody {
    pub committed_at: Option<Timestamp>,
}

#[derive(Serialize)]
pub struct ChangeResponse {
    pub delivered: usize,
}

pub async fn handle(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    body: Result<Json<ChangeBody>, JsonRejection>,
) -> impl IntoResponse {
    let committed_at = match body {
        Ok(Json(body)) => body.committed_at,
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let delivered = state
        .feed
        .publish(ChangeNotification {
            resource,
            committed_at,
        })
        .await;

    (StatusCode::ACCEPTED, Json(ChangeResponse { delivered })).into_response()
}
