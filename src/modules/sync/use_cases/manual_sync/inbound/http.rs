use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::shell::state::AppState;

#[derive(Serialize)]
pub struct TriggerSyncResponse {
    pub accepted: bool,
    pub watchers: usize,
}

pub async fn handle(State(state): State<AppState>) -> impl IntoResponse {
    state.dispatcher.trigger_sync();
    (
        StatusCode::ACCEPTED,
        Json(TriggerSyncResponse {
            accepted: true,
            watchers: state.dispatcher.receiver_count(),
        }),
    )
}
