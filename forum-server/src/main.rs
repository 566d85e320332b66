use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use forum_core::Forum;
use std::net::SocketAddr;
use structopt::StructOpt;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod error;
mod extractors;
mod handlers;
mod users;


use error::Error;
use extractors::{AppState, ForumState};
use users::UserDb;

#[derive(Debug, structopt::StructOpt)]
#[structopt(name = "forum-server", about = "Serve the forum over HTTP")]
struct Opt {
    /// Address to listen on
    #[structopt(long, env = "FORUM_LISTEN", default_value = "127.0.0.1:9090")]
    listen: SocketAddr,

    /// Work factor used when hashing passwords
    #[structopt(long, env = "FORUM_BCRYPT_COST", default_value = "12")]
    bcrypt_cost: u32,
}

pub fn app(state: AppState) -> Router {
    use handlers::*;
    Router::new()
        .route("/api/register", post(register))
        .route("/api/auth", post(auth))
        .route("/api/unauth", post(unauth))
        .route("/api/whoami", get(whoami))
        .route("/api/users", get(fetch_users))
        .route("/api/posts", get(fetch_posts).post(create_post))
        .route("/api/popular-posts", get(popular_posts))
        .route("/api/post/:id", get(fetch_post))
        .route("/api/post/:id/edit", post(edit_post))
        .route("/api/post/:id/delete", post(delete_post))
        .route("/api/post/:id/vote", post(vote_on_post))
        .route("/api/post/:id/comment", post(add_comment))
        .route("/api/post/:id/reply", post(add_reply))
        .route("/api/post/:id/comment/vote", post(vote_on_comment))
        .route("/api/post/:id/comment/edit", post(edit_comment))
        .route("/api/post/:id/comment/delete", post(delete_comment))
        .route("/api/user/:name", get(profile))
        .route("/api/user/:name/posts", get(user_posts))
        .route("/api/user/:name/comments", get(user_comments))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opt = Opt::from_args();
    let state = AppState {
        forum: ForumState::new(Forum::new()),
        users: UserDb::new(opt.bcrypt_cost),
    };

    tracing::info!(listen = %opt.listen, "starting forum server");
    axum::Server::bind(&opt.listen)
        .serve(app(state).into_make_service())
        .await
        .context("serving axum webserver")
}
