use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized record of the latest change to a subscribed entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateData {
    pub id: u64,
    pub name: String,
    pub date: DateTime<Utc>,
    /// The newest post of the entity.
    pub last: u64,
    pub thumbnail_md5: Option<String>,
}

/// Maps an update record to what the notification list displays.
pub trait UpdateDefinition: Send + Sync {
    fn image_src(&self, data: &UpdateData) -> String;
    fn image_href(&self, data: &UpdateData) -> String;
    fn update_href(&self, data: &UpdateData) -> String;
    fn update_text(&self, data: &UpdateData) -> String;
    fn source_href(&self, data: &UpdateData) -> String;
    fn source_text(&self, data: &UpdateData) -> String;

    fn render(&self, data: &UpdateData) -> UpdateView {
        UpdateView {
            id: data.id,
            date: data.date,
            image_src: self.image_src(data),
            image_href: self.image_href(data),
            update_href: self.update_href(data),
            update_text: self.update_text(data),
            source_href: self.source_href(data),
            source_text: self.source_text(data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateView {
    pub id: u64,
    pub date: DateTime<Utc>,
    pub image_src: String,
    pub image_href: String,
    pub update_href: String,
    pub update_text: String,
    pub source_href: String,
    pub source_text: String,
}

#[derive(Debug, Clone)]
pub struct PoolUpdateDefinition {
    base_url: String,
}

impl PoolUpdateDefinition {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for PoolUpdateDefinition {
    fn default() -> Self {
        Self::new(e621_client::BASE_URL)
    }
}

impl UpdateDefinition for PoolUpdateDefinition {
    fn image_src(&self, data: &UpdateData) -> String {
        data.thumbnail_md5
            .as_deref()
            .map(e621_client::preview_url)
            .unwrap_or_default()
    }

    fn image_href(&self, data: &UpdateData) -> String {
        format!("{}/pools/{}", self.base_url, data.id)
    }

    fn update_href(&self, data: &UpdateData) -> String {
        format!("{}/posts/{}?pool_id={}", self.base_url, data.last, data.id)
    }

    fn update_text(&self, data: &UpdateData) -> String {
        data.name.clone()
    }

    fn source_href(&self, data: &UpdateData) -> String {
        format!("{}/pools/{}", self.base_url, data.id)
    }

    fn source_text(&self, _data: &UpdateData) -> String {
        "All Posts".to_string()
    }
}
