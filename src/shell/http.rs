use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::sync::use_cases::manual_sync::inbound::http as manual_sync_http;
use crate::modules::sync::use_cases::receive_change::inbound::http as receive_change_http;
use crate::modules::sync::use_cases::sync_status::inbound::http as sync_status_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sync", post(manual_sync_http::handle))
        .route("/changes/{resource}", post(receive_change_http::handle))
        .route("/status", get(sync_status_http::handle))
        .with_state(state)
}
