use async_trait::async_trait;

use e621_client::{E621Client, PoolResult, PostResult};

/// The endpoints pool subscriptions need from the site.
#[async_trait]
pub trait PoolApi: Send + Sync {
    async fn pools_by_ids(&self, ids: &[u64]) -> e621_client::Result<Vec<PoolResult>>;
    async fn post(&self, id: u64) -> e621_client::Result<PostResult>;
}

#[async_trait]
impl PoolApi for E621Client {
    async fn pools_by_ids(&self, ids: &[u64]) -> e621_client::Result<Vec<PoolResult>> {
        E621Client::pools_by_ids(self, ids).await
    }

    async fn post(&self, id: u64) -> e621_client::Result<PostResult> {
        E621Client::post(self, id).await
    }
}
