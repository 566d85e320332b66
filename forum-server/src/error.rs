use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use forum_core::api::Error as ApiError;

/// Failure of a request. `Rejected` requests are answered with their error as
/// is, `Internal` failures only ever reach the logs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    #[error(transparent)]
    Rejected(#[from] ApiError),
}

impl Error {
    pub fn unauthenticated() -> Error {
        ApiError::Unauthenticated.into()
    }

    pub fn permission_denied() -> Error {
        ApiError::PermissionDenied.into()
    }

    pub fn not_found() -> Error {
        ApiError::NotFound.into()
    }

    pub fn name_already_used(name: String) -> Error {
        ApiError::NameAlreadyUsed(name).into()
    }

    /// What the client gets to see of this error
    fn public(self) -> ApiError {
        match self {
            Error::Rejected(err) => {
                tracing::debug!(status = %err.status_code(), "rejecting request: {err}");
                err
            }
            Error::Internal(err) => {
                tracing::error!(?err, "request failed on the server side");
                if cfg!(test) {
                    ApiError::Unknown(format!("{err:?}"))
                } else {
                    ApiError::Unknown(String::from("internal server error, see logs for details"))
                }
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let err = self.public();
        let status = err.status_code();
        let mut resp = (status, err.contents()).into_response();
        let headers = resp.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        if status == StatusCode::UNAUTHORIZED {
            headers.insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        resp
    }
}
