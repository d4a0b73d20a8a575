use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bell_util::iso8601;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PoolResult {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creator_id: Option<u64>,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub category: PoolCategory,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub post_count: u32,
    /// Posts in pool order.
    pub post_ids: Vec<u64>,
    #[serde(default, with = "iso8601::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "iso8601")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PoolCategory {
    #[default]
    Series,
    Collection,
    #[serde(other)]
    Other,
}

/// `GET /posts/<id>.json` wraps the post in an object.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PostResponse {
    pub post: PostResult,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PostResult {
    pub id: u64,
    pub file: FileResult,
    #[serde(default)]
    pub preview: Option<PreviewResult>,
    #[serde(default)]
    pub rating: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FileResult {
    pub md5: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Null for posts hidden from anonymous users.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PreviewResult {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}
