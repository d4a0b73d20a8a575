use std::{future::Future, result::Result};

use crate::error::{JobError, ServerError};

pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 600;
pub const MAX_NOTIFICATIONS: usize = 200;

pub fn timeout<T, E: Into<ServerError>>(
    f: impl Future<Output = Result<T, E>>,
) -> impl Future<Output = Result<T, ServerError>> {
    use futures::FutureExt;
    tokio::time::timeout(std::time::Duration::from_millis(DEFAULT_TIMEOUT_MS), f).map(move |result| {
        result
            .map(|r| r.map_err(Into::into))
            .unwrap_or_else(|_| Err(JobError::Timeout(DEFAULT_TIMEOUT_MS).into()))
    })
}
