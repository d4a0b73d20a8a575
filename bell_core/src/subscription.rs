use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::update::{UpdateData, UpdateDefinition};

/// A provider of update notifications for one kind of subscribed entity,
/// like pools or tags.
#[async_trait]
pub trait Subscription: Send + Sync {
    /// Display name of the provider, e.g. "Pools".
    fn name(&self) -> &str;

    /// Disabled providers are skipped by the manager.
    fn enabled(&self) -> Result<bool>;

    fn update_definition(&self) -> &dyn UpdateDefinition;

    /// Entities changed after `last_update`, in the order the site returned them.
    /// Moving the watermark is up to the caller.
    async fn get_updated_entries(&self, last_update: DateTime<Utc>) -> Result<Vec<UpdateData>>;
}
