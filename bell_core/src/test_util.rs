use async_trait::async_trait;
use chrono::{DateTime, Utc};

use std::collections::HashMap;
use std::sync::Mutex;

use e621_client::{FileResult, PoolCategory, PoolResult, PostResult};

use crate::api::PoolApi;

pub fn pool(id: u64, name: &str, updated_at: &str, post_ids: &[u64]) -> PoolResult {
    PoolResult {
        id,
        name: name.to_string(),
        description: String::new(),
        creator_id: Some(1),
        creator_name: None,
        category: PoolCategory::Series,
        is_active: true,
        post_count: post_ids.len() as u32,
        post_ids: post_ids.to_vec(),
        created_at: None,
        updated_at: time(updated_at),
    }
}

pub fn time(s: &str) -> DateTime<Utc> {
    bell_util::iso8601::parse(s).unwrap()
}

/// In-memory site that records every request it serves.
#[derive(Default)]
pub struct FakeApi {
    pub pools: Vec<PoolResult>,
    /// post_id -> md5
    pub posts: HashMap<u64, String>,
    pub fail: bool,
    /// Post lookups fail with a malformed body instead of a 404.
    pub fail_posts: bool,
    /// Answer pool lookups with every known pool, requested or not.
    pub ignore_ids: bool,
    pub pool_requests: Mutex<Vec<Vec<u64>>>,
    pub post_requests: Mutex<Vec<u64>>,
}

impl FakeApi {
    pub fn new(pools: Vec<PoolResult>, posts: &[(u64, &str)]) -> Self {
        Self {
            pools,
            posts: posts.iter().map(|(id, md5)| (*id, md5.to_string())).collect(),
            ..Default::default()
        }
    }

    pub fn request_count(&self) -> usize {
        self.pool_requests.lock().unwrap().len() + self.post_requests.lock().unwrap().len()
    }

    pub fn post_request_count(&self) -> usize {
        self.post_requests.lock().unwrap().len()
    }
}

fn not_json() -> e621_client::Error {
    serde_json::from_str::<serde_json::Value>("<html>").unwrap_err().into()
}

#[async_trait]
impl PoolApi for FakeApi {
    async fn pools_by_ids(&self, ids: &[u64]) -> e621_client::Result<Vec<PoolResult>> {
        self.pool_requests.lock().unwrap().push(ids.to_vec());
        if self.fail {
            return Err(not_json());
        }
        Ok(self
            .pools
            .iter()
            .filter(|p| self.ignore_ids || ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn post(&self, id: u64) -> e621_client::Result<PostResult> {
        self.post_requests.lock().unwrap().push(id);
        if self.fail_posts {
            return Err(not_json());
        }
        let md5 = self
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| e621_client::Error::NotFound(format!("/posts/{}.json", id)))?;
        Ok(PostResult {
            id,
            file: FileResult {
                md5,
                ext: Some("png".to_string()),
                size: None,
                width: None,
                height: None,
                url: None,
            },
            preview: None,
            rating: None,
        })
    }
}
