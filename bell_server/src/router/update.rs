use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::{
    background_job::{self, UpdateCheckJobStateResponse},
    error::Result,
    payload::UpdatesResponse,
    state::AppState,
};

pub fn update_router() -> Router<AppState> {
    Router::new()
        .route("/updates", get(get_updates))
        .route("/updates/check", post(check_updates))
}

async fn get_updates(State(app_state): State<AppState>) -> Result<Json<UpdatesResponse>> {
    let job = UpdateCheckJobStateResponse::from(&*app_state.update_check_state.borrow());
    let last_update = app_state.manager.recorded_last_update()?;
    let notifications = app_state.notifications.read().await.clone();

    Ok(Json(UpdatesResponse {
        job,
        last_update,
        notifications,
    }))
}

async fn check_updates(State(app_state): State<AppState>) -> Result<Json<bool>> {
    let queued = background_job::send_update_check(&app_state)?;
    Ok(Json(queued))
}
