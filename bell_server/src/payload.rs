use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bell_core::toggle::ToggleState;
use bell_core::update::UpdateView;

use crate::background_job::UpdateCheckJobStateResponse;

#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlsResponse {
    pub pool_id: u64,
    pub state: ToggleState,
    pub subscribe_visible: bool,
    pub unsubscribe_visible: bool,
}

impl ControlsResponse {
    pub fn new(pool_id: u64, state: ToggleState) -> Self {
        Self {
            pool_id,
            state,
            subscribe_visible: state.subscribe_visible(),
            unsubscribe_visible: state.unsubscribe_visible(),
        }
    }
}

/// One entry of the notification list.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub source: String,
    #[serde(flatten)]
    pub update: UpdateView,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatesResponse {
    pub job: UpdateCheckJobStateResponse,
    pub last_update: Option<DateTime<Utc>>,
    pub notifications: Vec<Notification>,
}
