use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{self, request},
};
use forum_core::{
    api::{AuthToken, UserId, Uuid},
    Forum,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{Error, UserDb};

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub forum: ForumState,
    pub users: UserDb,
}

/// The one forum of this process. Every request takes the lock once and keeps
/// it for the whole operation, so that scores, ledgers and the popularity
/// index are always seen in sync.
#[derive(Clone)]
pub struct ForumState(Arc<RwLock<Forum>>);

impl ForumState {
    pub fn new(forum: Forum) -> ForumState {
        ForumState(Arc::new(RwLock::new(forum)))
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Forum> {
        self.0.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Forum> {
        self.0.write().await
    }
}

pub struct PreAuth(pub AuthToken);

#[async_trait]
impl<S: Sync> FromRequestParts<S> for PreAuth {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<PreAuth, Error> {
        match req.headers.get(http::header::AUTHORIZATION) {
            None => Err(Error::unauthenticated()),
            Some(auth) => {
                let auth = auth.to_str().map_err(|_| Error::unauthenticated())?;
                let mut auth = auth.split(' ');
                if !auth
                    .next()
                    .ok_or(Error::unauthenticated())?
                    .eq_ignore_ascii_case("bearer")
                {
                    return Err(Error::unauthenticated());
                }
                let token = auth.next().ok_or(Error::unauthenticated())?;
                if !auth.next().is_none() {
                    return Err(Error::unauthenticated());
                }
                let token = Uuid::try_from(token).map_err(|_| Error::unauthenticated())?;
                Ok(PreAuth(AuthToken(token)))
            }
        }
    }
}

pub struct Auth(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, state: &AppState) -> Result<Auth, Error> {
        let token = PreAuth::from_request_parts(req, state).await?.0;
        Ok(Auth(state.users.recover_session(token).await?))
    }
}

/// The current user if the request carries a valid session, and `None`
/// otherwise. Lets the forum itself reject anonymous actions.
pub struct MaybeAuth(pub Option<UserId>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuth {
    type Rejection = Error;

    async fn from_request_parts(
        req: &mut request::Parts,
        state: &AppState,
    ) -> Result<MaybeAuth, Error> {
        match Auth::from_request_parts(req, state).await {
            Ok(Auth(user)) => Ok(MaybeAuth(Some(user))),
            Err(Error::Rejected(forum_core::api::Error::Unauthenticated)) => Ok(MaybeAuth(None)),
            Err(e) => Err(e),
        }
    }
}
