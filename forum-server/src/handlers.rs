use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use forum_core::{
    api::{
        AuthToken, CommentEdit, CommentTarget, CommentVote, NewComment, NewPost, NewReply,
        NewSession, NewUser, PostEdit, PostFilter, PostId, User, UserId, Vote,
    },
    AuthoredComment, Comment, Post, Profile,
};

use crate::{extractors::*, Error, UserDb};

pub async fn register(
    State(users): State<UserDb>,
    Json(data): Json<NewUser>,
) -> Result<Json<UserId>, Error> {
    data.validate()?;
    let name = data.name.clone();
    let id = users.create_user(data).await?;
    tracing::info!(?id, %name, "registered new user");
    Ok(Json(id))
}

pub async fn auth(
    State(users): State<UserDb>,
    Json(data): Json<NewSession>,
) -> Result<Json<AuthToken>, Error> {
    data.validate()?;
    Ok(Json(
        users
            .login_user(&data)
            .await
            .context("logging user in")?
            .ok_or(Error::permission_denied())?,
    ))
}

pub async fn unauth(user: PreAuth, State(users): State<UserDb>) -> Result<(), Error> {
    match users.logout_user(&user.0).await {
        true => Ok(()),
        false => Err(Error::unauthenticated()),
    }
}

pub async fn whoami(Auth(user): Auth) -> Json<UserId> {
    Json(user)
}

pub async fn fetch_users(State(users): State<UserDb>) -> Json<Vec<User>> {
    Json(users.fetch_users().await)
}

pub async fn fetch_posts(
    State(forum): State<ForumState>,
    Query(filter): Query<PostFilter>,
) -> Json<Vec<Post>> {
    let forum = forum.read().await;
    Json(forum.filter_posts(&filter).into_iter().cloned().collect())
}

pub async fn popular_posts(State(forum): State<ForumState>) -> Json<Vec<Post>> {
    let forum = forum.read().await;
    Json(forum.popular_posts().into_iter().cloned().collect())
}

pub async fn fetch_post(
    State(forum): State<ForumState>,
    Path(id): Path<PostId>,
) -> Result<Json<Post>, Error> {
    Ok(Json(forum.read().await.post(id)?.clone()))
}

pub async fn create_post(
    Auth(user): Auth,
    State(forum): State<ForumState>,
    Json(data): Json<NewPost>,
) -> Result<Json<Post>, Error> {
    data.validate()?;
    let mut forum = forum.write().await;
    let post = forum.create_post(data, user, Utc::now());
    tracing::info!(id = ?post.id, ?user, "created post");
    Ok(Json(post.clone()))
}

pub async fn edit_post(
    Auth(user): Auth,
    State(forum): State<ForumState>,
    Path(id): Path<PostId>,
    Json(data): Json<PostEdit>,
) -> Result<Json<Post>, Error> {
    data.validate()?;
    let mut forum = forum.write().await;
    let post = forum.edit_post(id, data)?;
    tracing::debug!(?id, ?user, "edited post");
    Ok(Json(post.clone()))
}

pub async fn delete_post(
    Auth(user): Auth,
    State(forum): State<ForumState>,
    Path(id): Path<PostId>,
) -> Result<(), Error> {
    forum.write().await.delete_post(id)?;
    tracing::info!(?id, ?user, "deleted post");
    Ok(())
}

pub async fn vote_on_post(
    MaybeAuth(user): MaybeAuth,
    State(forum): State<ForumState>,
    Path(id): Path<PostId>,
    Json(vote): Json<Vote>,
) -> Result<Json<i64>, Error> {
    Ok(Json(forum.write().await.vote_on_post(id, user, vote)?))
}

pub async fn add_comment(
    Auth(user): Auth,
    State(forum): State<ForumState>,
    Path(id): Path<PostId>,
    Json(data): Json<NewComment>,
) -> Result<Json<Comment>, Error> {
    data.validate()?;
    let mut forum = forum.write().await;
    let comment = forum.add_comment(id, data.text, user, Utc::now())?;
    Ok(Json(comment.clone()))
}

pub async fn add_reply(
    Auth(user): Auth,
    State(forum): State<ForumState>,
    Path(id): Path<PostId>,
    Json(data): Json<NewReply>,
) -> Result<Json<Comment>, Error> {
    data.validate()?;
    let parent = data.parent()?;
    let mut forum = forum.write().await;
    let reply = forum.add_reply(id, &parent, data.text, user, Utc::now())?;
    Ok(Json(reply.clone()))
}

pub async fn vote_on_comment(
    MaybeAuth(user): MaybeAuth,
    State(forum): State<ForumState>,
    Path(id): Path<PostId>,
    Json(data): Json<CommentVote>,
) -> Result<Json<i64>, Error> {
    let target = data.target()?;
    let mut forum = forum.write().await;
    Ok(Json(forum.vote_on_comment(id, &target, user, data.vote)?))
}

pub async fn edit_comment(
    Auth(user): Auth,
    State(forum): State<ForumState>,
    Path(id): Path<PostId>,
    Json(data): Json<CommentEdit>,
) -> Result<(), Error> {
    data.validate()?;
    let target = data.target()?;
    forum
        .write()
        .await
        .edit_comment(id, &target, data.text, Utc::now())?;
    tracing::debug!(post = ?id, comment = %target, ?user, "edited comment");
    Ok(())
}

pub async fn delete_comment(
    Auth(user): Auth,
    State(forum): State<ForumState>,
    Path(id): Path<PostId>,
    Json(data): Json<CommentTarget>,
) -> Result<(), Error> {
    let target = data.target()?;
    let removed = forum.write().await.delete_comment(id, &target)?;
    tracing::info!(
        post = ?id,
        comment = ?removed.id,
        ?user,
        "deleted comment"
    );
    Ok(())
}

pub async fn profile(
    State(users): State<UserDb>,
    State(forum): State<ForumState>,
    Path(name): Path<String>,
) -> Result<Json<Profile>, Error> {
    let user = users.user_by_name(&name).await.ok_or(Error::not_found())?;
    Ok(Json(forum.read().await.profile(user)))
}

pub async fn user_posts(
    State(users): State<UserDb>,
    State(forum): State<ForumState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Post>>, Error> {
    let user = users.user_by_name(&name).await.ok_or(Error::not_found())?;
    let forum = forum.read().await;
    Ok(Json(forum.posts_by(&user.id).into_iter().cloned().collect()))
}

pub async fn user_comments(
    State(users): State<UserDb>,
    State(forum): State<ForumState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<AuthoredComment>>, Error> {
    let user = users.user_by_name(&name).await.ok_or(Error::not_found())?;
    Ok(Json(forum.read().await.comments_by(&user.id)))
}
