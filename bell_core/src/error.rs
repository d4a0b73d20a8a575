use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not a pool page: {0}")]
    NotPoolPage(String),
    #[error("Pool {0} has no posts")]
    EmptyPool(u64),
    #[error("Pool {0} is not subscribed")]
    NotSubscribed(u64),

    #[error("Settings `{namespace}` has version {found}, expected {expected}")]
    SettingsVersion { namespace: String, found: u64, expected: u32 },
    #[error("Settings `{namespace}` is malformed at `{path}`: {source}")]
    SettingsShape {
        namespace: String,
        path: String,
        source: serde_json::Error,
    },

    #[error("API error: {0}")]
    ClientError(#[from] e621_client::Error),
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Cannot encode/decode JSON: {0}")]
    JSONError(#[from] serde_json::Error),
    #[error("Cannot parse URL: {0}")]
    UrlError(#[from] url::ParseError),
}
