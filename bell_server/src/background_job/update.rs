use itertools::Itertools;
use serde::Serialize;
use tokio::{
    sync::{mpsc, watch, RwLock},
    task,
    time::{self, Duration, MissedTickBehavior},
};

use std::sync::Arc;

use bell_core::{manager::UpdateBatch, SubscriptionManager};

use crate::{
    error::{JobError, Result},
    payload::Notification,
    state::AppState,
    util::{self, MAX_NOTIFICATIONS},
};

#[derive(Debug, Clone)]
pub enum UpdateCheckJobState {
    Ready,
    Running,
    Success { count: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum UpdateCheckJobStateResponse {
    Ready,
    Running,
    Success { count: usize },
    Failed { error: String },
}

impl From<&UpdateCheckJobState> for UpdateCheckJobStateResponse {
    fn from(state: &UpdateCheckJobState) -> Self {
        match state {
            UpdateCheckJobState::Ready => Self::Ready,
            UpdateCheckJobState::Running => Self::Running,
            UpdateCheckJobState::Success { count } => Self::Success { count: *count },
            UpdateCheckJobState::Failed { error } => Self::Failed { error: error.clone() },
        }
    }
}

pub type UpdateCheckJobQueue = mpsc::UnboundedSender<()>;
pub type UpdateCheckJobStateSender = watch::Sender<UpdateCheckJobState>;
pub type UpdateCheckJobStateReceiver = watch::Receiver<UpdateCheckJobState>;

/// Used in server handler. Return true if the check was queued.
pub fn send_update_check(app_state: &AppState) -> Result<bool> {
    let state = app_state.update_check_state.borrow().clone();
    if matches!(state, UpdateCheckJobState::Running) {
        // Skip if a check is already running
        return Ok(false);
    }
    app_state
        .update_check_queue
        .send(())
        .map_err(|_| JobError::QueueClosed)?;
    Ok(true)
}

/// Set up before server started. Checks run one at a time, in queue order.
pub fn listen_update_check(
    manager: Arc<SubscriptionManager>,
    notifications: Arc<RwLock<Vec<Notification>>>,
) -> (UpdateCheckJobQueue, UpdateCheckJobStateReceiver) {
    let (job_sender, mut job_receiver) = mpsc::unbounded_channel::<()>();
    let (state_sender, state_receiver) = watch::channel(UpdateCheckJobState::Ready);

    task::spawn(async move {
        while job_receiver.recv().await.is_some() {
            let result = check_updates(&manager, &notifications, &state_sender).await;
            if let Err(e) = result {
                tracing::error!("Update check job failed: {}", e);
                let _ = state_sender.send(UpdateCheckJobState::Failed { error: e.to_string() });
            }
        }
    });

    (job_sender, state_receiver)
}

/// Queue a check now and then every `interval`.
pub fn schedule_update_check(queue: UpdateCheckJobQueue, interval: Duration) {
    task::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if queue.send(()).is_err() {
                tracing::warn!("Update check queue closed, stopping schedule");
                break;
            }
        }
    });
}

async fn check_updates(
    manager: &SubscriptionManager,
    notifications: &RwLock<Vec<Notification>>,
    state_sender: &UpdateCheckJobStateSender,
) -> Result<()> {
    tracing::info!("Update check job started");
    state_sender.send(UpdateCheckJobState::Running)?;

    let batches = util::timeout(manager.check_updates()).await?;
    let new_items = flatten(batches);
    let count = new_items.len();

    if count > 0 {
        let mut notifications = notifications.write().await;
        let kept = std::mem::take(&mut *notifications);
        *notifications = new_items.into_iter().chain(kept).take(MAX_NOTIFICATIONS).collect();
    }

    tracing::info!("Update check job done: {} new notifications", count);
    state_sender.send(UpdateCheckJobState::Success { count })?;
    Ok(())
}

/// Newest first across all providers.
fn flatten(batches: Vec<UpdateBatch>) -> Vec<Notification> {
    batches
        .into_iter()
        .flat_map(|batch| {
            let source = batch.source;
            batch.updates.into_iter().map(move |update| Notification {
                source: source.clone(),
                update,
            })
        })
        .sorted_by(|a, b| b.update.date.cmp(&a.update.date))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use bell_core::update::UpdateView;

    use super::*;

    fn view(id: u64, day: u32) -> UpdateView {
        UpdateView {
            id,
            date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            image_src: String::new(),
            image_href: String::new(),
            update_href: String::new(),
            update_text: String::new(),
            source_href: String::new(),
            source_text: String::new(),
        }
    }

    #[test]
    fn test_flatten_sorts_newest_first() {
        let batches = vec![
            UpdateBatch {
                source: "Pools".to_string(),
                updates: vec![view(1, 2), view(2, 5)],
            },
            UpdateBatch {
                source: "Tags".to_string(),
                updates: vec![view(3, 3)],
            },
        ];
        let items = flatten(batches);
        assert_eq!(items.iter().map(|n| n.update.id).collect::<Vec<_>>(), vec![2, 3, 1]);
        assert_eq!(items[1].source, "Tags");
    }

    #[test]
    fn test_state_response_is_tagged() {
        let state = UpdateCheckJobState::Success { count: 2 };
        let value = serde_json::to_value(UpdateCheckJobStateResponse::from(&state)).unwrap();
        assert_eq!(value, serde_json::json!({ "state": "success", "count": 2 }));
    }
}
