use url::Url;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// `/pools/<id>`
    Pool,
    /// `/pools`
    PoolIndex,
    /// `/posts/<id>`
    Post,
    /// `/posts`
    Search,
    Other,
}

/// A site page identified by its URL.
#[derive(Debug, Clone)]
pub struct Page {
    kind: PageKind,
    id: Option<String>,
}

impl Page {
    pub fn parse(url: &str) -> Result<Page> {
        let url = Url::parse(url)?;
        Ok(Self::from_path(url.path()))
    }

    pub fn from_path(path: &str) -> Page {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let (kind, id) = match segments.as_slice() {
            ["pools"] => (PageKind::PoolIndex, None),
            ["pools", id] => match numeric_id(id) {
                Some(id) => (PageKind::Pool, Some(id)),
                None => (PageKind::Other, None),
            },
            ["posts"] => (PageKind::Search, None),
            ["posts", id] => match numeric_id(id) {
                Some(id) => (PageKind::Post, Some(id)),
                None => (PageKind::Other, None),
            },
            _ => (PageKind::Other, None),
        };
        Page {
            kind,
            id: id.map(str::to_string),
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn matches(&self, kind: PageKind) -> bool {
        self.kind == kind
    }

    pub fn page_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn pool_id(&self) -> Result<u64> {
        match (self.kind, self.page_id().and_then(|id| id.parse().ok())) {
            (PageKind::Pool, Some(id)) => Ok(id),
            _ => Err(Error::NotPoolPage(format!("{:?}", self.kind))),
        }
    }
}

/// Site pages like `/pools/gallery` share the prefix of numbered ones.
fn numeric_id(segment: &str) -> Option<&str> {
    let id = segment.trim_end_matches(".json");
    id.parse::<u64>().ok().map(|_| id)
}
