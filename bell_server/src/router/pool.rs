use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};

use bell_core::{
    page::Page,
    toggle::{RecordingSurface, ToggleAction},
    Error as BellError,
};

use crate::{
    error::Result,
    payload::{ControlsResponse, PageQuery},
    state::AppState,
};

pub fn pool_router() -> Router<AppState> {
    Router::new()
        .route("/pools", get(get_pools))
        .route("/page", get(get_page_controls))
        .route("/pool/:id/subscribe", post(subscribe))
        .route("/pool/:id/unsubscribe", post(unsubscribe))
}

async fn get_pools(State(app_state): State<AppState>) -> Result<Json<Vec<u64>>> {
    let ids = app_state.pools.subscribed_ids()?;
    Ok(Json(ids))
}

/// Controls to show on a site page, `null` when the page is not a pool.
async fn get_page_controls(
    State(app_state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Option<ControlsResponse>>> {
    let page = Page::parse(&query.url)?;
    let mut surface = RecordingSurface::default();
    let buttons = app_state.pools.add_subscribe_buttons(&page, &mut surface)?;

    Ok(Json(buttons.map(|b| ControlsResponse::new(b.pool_id(), b.state()))))
}

async fn subscribe(State(app_state): State<AppState>, Path(id): Path<u64>) -> Result<Json<ControlsResponse>> {
    apply(&app_state, id, ToggleAction::Subscribe)
}

async fn unsubscribe(State(app_state): State<AppState>, Path(id): Path<u64>) -> Result<Json<ControlsResponse>> {
    apply(&app_state, id, ToggleAction::Unsubscribe)
}

fn apply(app_state: &AppState, pool_id: u64, action: ToggleAction) -> Result<Json<ControlsResponse>> {
    let page = Page::from_path(&format!("/pools/{}", pool_id));
    let mut surface = RecordingSurface::default();
    let mut buttons = app_state
        .pools
        .add_subscribe_buttons(&page, &mut surface)?
        .ok_or_else(|| BellError::NotPoolPage(pool_id.to_string()))?;
    buttons.handle_action(&app_state.pools, &mut surface, action)?;

    Ok(Json(ControlsResponse::new(pool_id, buttons.state())))
}
