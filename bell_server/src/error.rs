use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use bell_core::Error as BellError;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Timeout after {0} ms")]
    Timeout(u64),
    #[error("Update check queue closed")]
    QueueClosed,
}

#[derive(Debug)]
pub struct ServerError(anyhow::Error);

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        let status = self.status_code();
        (status, self.to_string()).into_response()
    }
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        let err = &self.0;
        for cause in err.chain() {
            if let Some(err) = cause.downcast_ref::<e621_client::Error>() {
                match err {
                    e621_client::Error::NotFound(_) => return StatusCode::BAD_GATEWAY,
                    e621_client::Error::NetworkError(_) => return StatusCode::BAD_GATEWAY,
                    e621_client::Error::JSONError(_) => return StatusCode::BAD_GATEWAY,
                    _ => return StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
            if let Some(err) = cause.downcast_ref::<BellError>() {
                match err {
                    BellError::NotPoolPage(_) => return StatusCode::BAD_REQUEST,
                    BellError::UrlError(_) => return StatusCode::BAD_REQUEST,
                    BellError::ClientError(_) => return StatusCode::BAD_GATEWAY,
                    _ => return StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
            if let Some(err) = cause.downcast_ref::<JobError>() {
                match err {
                    JobError::Timeout(_) => return StatusCode::GATEWAY_TIMEOUT,
                    JobError::QueueClosed => return StatusCode::SERVICE_UNAVAILABLE,
                }
            }
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
