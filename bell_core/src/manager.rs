use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::sync::Arc;

use crate::error::Result;
use crate::settings::{fetch_settings, push_settings, Settings, SettingsStore};
use crate::subscription::Subscription;
use crate::update::UpdateView;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerSettings {
    pub version: u32,
    /// Changes up to this time have been delivered already.
    #[serde(default, with = "bell_util::iso8601::option")]
    pub last_update: Option<DateTime<Utc>>,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            version: Self::VERSION,
            last_update: None,
        }
    }
}

impl Settings for ManagerSettings {
    const NAMESPACE: &'static str = "subscriptions";
    const VERSION: u32 = 1;
}

/// Updates of one provider, ready for the notification list.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateBatch {
    pub source: String,
    pub updates: Vec<UpdateView>,
}

/// Runs every subscription provider against a shared watermark.
pub struct SubscriptionManager {
    store: Arc<dyn SettingsStore>,
    subscriptions: Vec<Arc<dyn Subscription>>,
}

impl SubscriptionManager {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            subscriptions: Vec::new(),
        }
    }

    pub fn register(mut self, subscription: Arc<dyn Subscription>) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    /// The watermark, or the earliest representable time before the first check.
    pub fn last_update(&self) -> Result<DateTime<Utc>> {
        Ok(self.recorded_last_update()?.unwrap_or(DateTime::<Utc>::MIN_UTC))
    }

    pub fn recorded_last_update(&self) -> Result<Option<DateTime<Utc>>> {
        let settings: ManagerSettings = fetch_settings(self.store.as_ref())?;
        Ok(settings.last_update)
    }

    pub fn set_last_update(&self, time: DateTime<Utc>) -> Result<()> {
        let mut settings: ManagerSettings = fetch_settings(self.store.as_ref())?;
        settings.last_update = Some(time);
        push_settings(self.store.as_ref(), &settings)
    }

    /// Collect updates from every enabled provider, then advance the watermark
    /// to the time the check started. A failing provider aborts the check and
    /// leaves the watermark where it was.
    pub async fn check_updates(&self) -> Result<Vec<UpdateBatch>> {
        let started_at = Utc::now();
        let last_update = self.last_update()?;

        let mut batches = Vec::new();
        for subscription in self.subscriptions.iter() {
            if !subscription.enabled()? {
                tracing::debug!("Skipped disabled subscription {}", subscription.name());
                continue;
            }
            let entries = subscription.get_updated_entries(last_update).await?;
            let definition = subscription.update_definition();
            batches.push(UpdateBatch {
                source: subscription.name().to_string(),
                updates: entries.iter().map(|data| definition.render(data)).collect(),
            });
        }

        self.set_last_update(started_at)?;
        let total: usize = batches.iter().map(|b| b.updates.len()).sum();
        tracing::info!("Update check done: {} updates since {}", total, last_update);
        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolSubscriptions;
    use crate::settings::MemorySettingsStore;
    use crate::test_util::{pool, time, FakeApi};

    fn setup(api: FakeApi) -> (SubscriptionManager, Arc<PoolSubscriptions>, Arc<FakeApi>) {
        let store = Arc::new(MemorySettingsStore::new());
        let api = Arc::new(api);
        let pools = Arc::new(PoolSubscriptions::new(store.clone(), api.clone()));
        let manager = SubscriptionManager::new(store).register(pools.clone());
        (manager, pools, api)
    }

    #[tokio::test]
    async fn test_check_advances_watermark() {
        let api = FakeApi::new(vec![pool(5, "foo_bar", "2024-01-02", &[10, 20, 30])], &[(10, "cafebabe")]);
        let (manager, pools, _) = setup(api);
        pools.subscribe(5).unwrap();
        assert_eq!(manager.recorded_last_update().unwrap(), None);
        assert_eq!(manager.last_update().unwrap(), DateTime::<Utc>::MIN_UTC);

        let batches = manager.check_updates().await.unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].source, "Pools");
        assert_eq!(batches[0].updates.len(), 1);
        assert_eq!(batches[0].updates[0].update_text, "foo bar");
        assert_eq!(batches[0].updates[0].update_href, "https://e621.net/posts/30?pool_id=5");
        assert!(manager.last_update().unwrap() > time("2024-01-02"));

        // Nothing changed since the last check
        let batches = manager.check_updates().await.unwrap();
        assert!(batches[0].updates.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_provider_is_skipped() {
        let api = FakeApi::new(vec![pool(5, "foo", "2024-01-02", &[10])], &[(10, "cafebabe")]);
        let (manager, pools, api) = setup(api);
        pools.subscribe(5).unwrap();
        pools.set_enabled(false).unwrap();

        let batches = manager.check_updates().await.unwrap();
        assert!(batches.is_empty());
        assert_eq!(api.request_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_check_keeps_watermark() {
        let api = FakeApi {
            fail: true,
            ..Default::default()
        };
        let (manager, pools, _) = setup(api);
        pools.subscribe(1).unwrap();
        manager.set_last_update(time("2024-01-01")).unwrap();

        assert!(manager.check_updates().await.is_err());
        assert_eq!(manager.last_update().unwrap(), time("2024-01-01"));
    }
}
