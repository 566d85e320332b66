use anyhow::{anyhow, Context};
use serde_json::json;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Not found")]
    NotFound,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Invalid comment path {0:?}")]
    InvalidPath(String),

    #[error("Parent comment not found")]
    ParentNotFound,

    #[error("Reply would nest deeper than {0} levels")]
    ReplyTooDeep(usize),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Name already used {0}")]
    NameAlreadyUsed(String),

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Invalid character in name {0:?}")]
    InvalidName(String),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::ParentNotFound => StatusCode::NOT_FOUND,
            Error::ReplyTooDeep(_) => StatusCode::BAD_REQUEST,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::NameAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
            Error::InvalidName(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::NotFound => json!({
                "message": "not found",
                "type": "not-found",
            }),
            Error::Unauthenticated => json!({
                "message": "unauthenticated",
                "type": "unauthenticated",
            }),
            Error::InvalidPath(p) => json!({
                "message": "invalid comment path",
                "type": "invalid-path",
                "path": p,
            }),
            Error::ParentNotFound => json!({
                "message": "parent comment not found",
                "type": "parent-not-found",
            }),
            Error::ReplyTooDeep(max) => json!({
                "message": "reply nests too deep",
                "type": "reply-too-deep",
                "max-depth": max,
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::NameAlreadyUsed(n) => json!({
                "message": "name already used",
                "type": "conflict-name",
                "name": n,
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
            Error::InvalidName(n) => json!({
                "message": "there was an invalid character in a user name",
                "type": "invalid-name",
                "name": n,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let field = |name: &str| data.get(name).and_then(|f| f.as_str()).map(String::from);
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(field("message").unwrap_or_default()),
                "not-found" => Error::NotFound,
                "unauthenticated" => Error::Unauthenticated,
                "invalid-path" => Error::InvalidPath(
                    field("path").ok_or_else(|| anyhow!("error is an invalid path without a path"))?,
                ),
                "parent-not-found" => Error::ParentNotFound,
                "reply-too-deep" => Error::ReplyTooDeep(
                    data.get("max-depth")
                        .and_then(|d| d.as_u64())
                        .and_then(|d| usize::try_from(d).ok())
                        .ok_or_else(|| anyhow!("error is a too-deep reply without a max depth"))?,
                ),
                "permission-denied" => Error::PermissionDenied,
                "conflict-name" => Error::NameAlreadyUsed(
                    field("name").ok_or_else(|| anyhow!("error is a name conflict without a name"))?,
                ),
                "null-byte" => Error::NullByteInString(field("string").ok_or_else(|| {
                    anyhow!("error is a null-byte-in-string without a string")
                })?),
                "invalid-name" => Error::InvalidName(field("name").ok_or_else(|| {
                    anyhow!("error is about an invalid name but no name was provided")
                })?),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}
