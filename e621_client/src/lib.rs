mod error;
mod result;
#[cfg(test)]
mod test;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use bell_util::build_params;

pub use crate::error::{Error, Result};
pub use crate::result::*;

pub const BASE_URL: &str = "https://e621.net";
pub const STATIC_URL: &str = "https://static1.e621.net";
/// Page size the pool index uses when no limit is given.
pub const POOL_PAGE_SIZE: usize = 75;

#[derive(Debug, Clone)]
pub struct Credential {
    pub login: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct E621Client {
    client: Client,
    base_url: String,
    credential: Option<Credential>,
}

impl E621Client {
    /// e621 rejects requests without a descriptive user agent.
    pub fn new(user_agent: &str) -> Result<E621Client> {
        Self::with_base_url(BASE_URL, user_agent)
    }

    pub fn with_base_url(base_url: &str, user_agent: &str) -> Result<E621Client> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(E621Client {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential: None,
        })
    }

    pub fn with_credential(mut self, credential: Credential) -> E621Client {
        self.credential = Some(credential);
        self
    }

    /// Fetch pools by ID in a single request. The API caps the response at
    /// `limit`, so callers with more than `POOL_PAGE_SIZE` IDs should batch.
    pub async fn pools_by_ids(&self, ids: &[u64]) -> Result<Vec<PoolResult>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let limit = ids.len();
        let params = build_params! {
            search_list id => ids,
            required limit,
        };
        self.get("/pools.json", params, "pools").await
    }

    pub async fn post(&self, id: u64) -> Result<PostResult> {
        let response: PostResponse = self.get(&format!("/posts/{}.json", id), Vec::new(), "post").await?;
        Ok(response.post)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: Vec<(String, String)>, name: &str) -> Result<T> {
        let url = if params.is_empty() {
            Url::parse(&format!("{}{}", self.base_url, path))?
        } else {
            Url::parse_with_params(&format!("{}{}", self.base_url, path), &params)?
        };
        tracing::debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(credential) = &self.credential {
            request = request.basic_auth(&credential.login, Some(&credential.api_key));
        }
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(path.to_string()));
        }
        let response = response.error_for_status()?;
        let content = response.text().await?;

        log(name, &content).await?;
        let result: T = serde_json::from_str(&content)?;
        Ok(result)
    }
}

/// Preview image URL for a post file fingerprint.
pub fn preview_url(md5: &str) -> String {
    match (md5.get(0..2), md5.get(2..4)) {
        (Some(a), Some(b)) => format!("{}/data/preview/{}/{}/{}.jpg", STATIC_URL, a, b, md5),
        _ => String::new(),
    }
}

async fn log(name: &str, content: &str) -> Result<()> {
    use std::path::PathBuf;
    use tokio::{fs::File, io::AsyncWriteExt};

    if let Ok(dir) = std::env::var("CLIENT_LOG_DIR") {
        let time = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let filepath = PathBuf::from(dir).join(format!("e621_{}_{}.json", name, time));
        let mut file = File::create(filepath).await?;
        file.write_all(content.as_bytes()).await?;
    }
    Ok(())
}
