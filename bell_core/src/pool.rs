use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use e621_client::{PoolResult, POOL_PAGE_SIZE};

use crate::api::PoolApi;
use crate::error::{Error, Result};
use crate::page::{Page, PageKind};
use crate::settings::{fetch_settings, push_settings, Settings, SettingsStore};
use crate::subscription::Subscription;
use crate::toggle::{ToggleAction, ToggleState, ToggleSurface};
use crate::update::{PoolUpdateDefinition, UpdateData, UpdateDefinition};

// MARK: Settings

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSettings {
    pub version: u32,
    pub enabled: bool,
    /// Subscribed pools: pool_id -> cached metadata
    pub pools: BTreeMap<u64, PoolInfo>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            version: Self::VERSION,
            enabled: true,
            pools: BTreeMap::new(),
        }
    }
}

impl Settings for PoolSettings {
    const NAMESPACE: &'static str = "pools";
    const VERSION: u32 = 1;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    /// Fingerprint of the first post, filled on the first update check.
    #[serde(default, alias = "thumbnailMd5", skip_serializing_if = "Option::is_none")]
    pub thumbnail_md5: Option<String>,
}

// MARK: Provider

pub struct PoolSubscriptions {
    store: Arc<dyn SettingsStore>,
    api: Arc<dyn PoolApi>,
    definition: PoolUpdateDefinition,
}

impl PoolSubscriptions {
    pub fn new(store: Arc<dyn SettingsStore>, api: Arc<dyn PoolApi>) -> Self {
        Self {
            store,
            api,
            definition: PoolUpdateDefinition::default(),
        }
    }

    pub fn with_definition(mut self, definition: PoolUpdateDefinition) -> Self {
        self.definition = definition;
        self
    }

    pub fn settings(&self) -> Result<PoolSettings> {
        fetch_settings(self.store.as_ref())
    }

    pub fn is_subscribed(&self, pool_id: u64) -> Result<bool> {
        Ok(self.settings()?.pools.contains_key(&pool_id))
    }

    pub fn subscribed_ids(&self) -> Result<Vec<u64>> {
        Ok(self.settings()?.pools.keys().copied().collect())
    }

    /// Add the pool with empty metadata. An existing entry keeps its cache.
    pub fn subscribe(&self, pool_id: u64) -> Result<()> {
        let mut settings = self.settings()?;
        settings.pools.entry(pool_id).or_default();
        push_settings(self.store.as_ref(), &settings)?;
        tracing::info!("Subscribed to pool {}", pool_id);
        Ok(())
    }

    pub fn unsubscribe(&self, pool_id: u64) -> Result<()> {
        let mut settings = self.settings()?;
        settings.pools.remove(&pool_id);
        push_settings(self.store.as_ref(), &settings)?;
        tracing::info!("Unsubscribed from pool {}", pool_id);
        Ok(())
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        let mut settings = self.settings()?;
        settings.enabled = enabled;
        push_settings(self.store.as_ref(), &settings)
    }

    /// Render the subscribe controls on a pool page. Other pages get nothing.
    pub fn add_subscribe_buttons<S: ToggleSurface>(
        &self,
        page: &Page,
        surface: &mut S,
    ) -> Result<Option<SubscribeButtons<S::Handle>>> {
        if !page.matches(PageKind::Pool) {
            return Ok(None);
        }
        let pool_id = page.pool_id()?;
        let state = ToggleState::from_subscribed(self.is_subscribed(pool_id)?);
        let handle = surface.render_toggle(state);
        Ok(Some(SubscribeButtons { pool_id, handle, state }))
    }

    /// Build the update record for a pool, backfilling its thumbnail into
    /// `settings` when missing. A deleted first post leaves the thumbnail
    /// empty and is retried on the next check.
    pub async fn format_pool_update(&self, pool: &PoolResult, settings: &mut PoolSettings) -> Result<UpdateData> {
        let (Some(&first), Some(&last)) = (pool.post_ids.first(), pool.post_ids.last()) else {
            return Err(Error::EmptyPool(pool.id));
        };
        let Some(info) = settings.pools.get_mut(&pool.id) else {
            return Err(Error::NotSubscribed(pool.id));
        };

        if info.thumbnail_md5.is_none() {
            match self.api.post(first).await {
                Ok(post) => {
                    tracing::debug!("Backfilled thumbnail of pool {} from post {}", pool.id, first);
                    info.thumbnail_md5 = Some(post.file.md5);
                }
                Err(e621_client::Error::NotFound(path)) => {
                    tracing::warn!("No thumbnail for pool {}: {} is gone", pool.id, path);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(UpdateData {
            id: pool.id,
            name: pool.name.replace('_', " "),
            date: pool.updated_at,
            last,
            thumbnail_md5: info.thumbnail_md5.clone(),
        })
    }

    async fn fetch_pools(&self, ids: &[u64]) -> Result<Vec<PoolResult>> {
        let mut pools = Vec::with_capacity(ids.len());
        for batch in ids.chunks(POOL_PAGE_SIZE) {
            pools.extend(self.api.pools_by_ids(batch).await?);
        }

        let returned: HashSet<u64> = pools.iter().map(|p| p.id).collect();
        for id in ids.iter().filter(|id| !returned.contains(id)) {
            tracing::debug!("Subscribed pool {} is missing from the response", id);
        }
        Ok(pools)
    }
}

#[async_trait]
impl Subscription for PoolSubscriptions {
    fn name(&self) -> &str {
        "Pools"
    }

    fn enabled(&self) -> Result<bool> {
        Ok(self.settings()?.enabled)
    }

    fn update_definition(&self) -> &dyn UpdateDefinition {
        &self.definition
    }

    async fn get_updated_entries(&self, last_update: DateTime<Utc>) -> Result<Vec<UpdateData>> {
        let mut settings = self.settings()?;
        if settings.pools.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<u64> = settings.pools.keys().copied().collect();
        let pools = self.fetch_pools(&ids).await?;

        let mut results = Vec::new();
        for pool in pools.iter().filter(|p| p.updated_at > last_update) {
            match self.format_pool_update(pool, &mut settings).await {
                Ok(update) => results.push(update),
                Err(Error::EmptyPool(id)) => tracing::warn!("Skipped pool {} without posts", id),
                Err(Error::NotSubscribed(id)) => tracing::debug!("Skipped unrequested pool {}", id),
                Err(e) => return Err(e),
            }
        }

        push_settings(self.store.as_ref(), &settings)?;
        tracing::info!("Checked {} pools, {} updated", pools.len(), results.len());
        Ok(results)
    }
}

// MARK: Controls

/// Subscribe controls rendered on one pool page.
#[derive(Debug)]
pub struct SubscribeButtons<H> {
    pool_id: u64,
    handle: H,
    state: ToggleState,
}

impl<H> SubscribeButtons<H> {
    pub fn pool_id(&self) -> u64 {
        self.pool_id
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// Apply a click: swap the visible control, then re-read, mutate and
    /// persist the settings.
    pub fn handle_action<S>(&mut self, subscriptions: &PoolSubscriptions, surface: &mut S, action: ToggleAction) -> Result<()>
    where
        S: ToggleSurface<Handle = H>,
    {
        let state = action.target();
        if state != self.state {
            surface.update_toggle(&self.handle, state);
            self.state = state;
        }
        match action {
            ToggleAction::Subscribe => subscriptions.subscribe(self.pool_id),
            ToggleAction::Unsubscribe => subscriptions.unsubscribe(self.pool_id),
        }
    }
}
