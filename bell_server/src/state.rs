use tokio::sync::RwLock;

use std::sync::Arc;

use bell_core::{PoolSubscriptions, SubscriptionManager};

use crate::background_job::*;
use crate::payload::Notification;

#[derive(Clone)]
pub struct AppState {
    pub pools: Arc<PoolSubscriptions>,
    pub manager: Arc<SubscriptionManager>,

    /// Newest first, capped at `MAX_NOTIFICATIONS`
    pub notifications: Arc<RwLock<Vec<Notification>>>,

    /// Update check job queue
    pub update_check_queue: UpdateCheckJobQueue,
    /// Update check job state
    pub update_check_state: UpdateCheckJobStateReceiver,
}
