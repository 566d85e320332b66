use anyhow::Context;
use forum_api::{
    AuthToken, CommentTarget, CommentVote, NewComment, NewPost, NewReply, NewSession, NewUser,
    PostFilter, Uuid, Vote,
};

#[derive(structopt::StructOpt)]
#[structopt(name = "forum-ctl", about = "Talk to a running forum server")]
struct Opt {
    #[structopt(short, long, env = "FORUM_HOST", default_value = "http://127.0.0.1:9090")]
    host: String,

    /// Session token, as printed by `login`
    #[structopt(short, long, env = "FORUM_TOKEN")]
    token: Option<Uuid>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Create a user
    Register { name: String, password: String },

    /// Open a session, and print its token
    Login { name: String, password: String },

    /// Close the current session
    Logout,

    /// List posts, optionally filtered
    List {
        #[structopt(long)]
        category: Option<String>,

        /// Comma-separated, any of them is enough
        #[structopt(long)]
        tags: Option<String>,
    },

    /// List the most upvoted posts
    Popular,

    /// Show a post with all its comments
    Show { post: u64 },

    /// Write a new post
    Post {
        title: String,
        content: String,

        #[structopt(long)]
        tags: Option<String>,

        #[structopt(long)]
        category: Option<String>,
    },

    /// Comment on a post
    Comment { post: u64, text: String },

    /// Reply to the comment at path `parent`, like `0-2`
    Reply {
        post: u64,
        parent: String,
        text: String,
    },

    /// Upvote a post, or one of its comments
    Upvote {
        post: u64,

        /// Path of the comment, or `id:N`
        #[structopt(long)]
        comment: Option<String>,
    },

    /// Downvote a post, or one of its comments
    Downvote {
        post: u64,

        /// Path of the comment, or `id:N`
        #[structopt(long)]
        comment: Option<String>,
    },

    DeletePost { post: u64 },

    DeleteComment { post: u64, comment: String },

    /// Show a user's latest activity
    Profile { name: String },
}

struct Client {
    http: reqwest::Client,
    host: String,
    token: Option<AuthToken>,
}

impl Client {
    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(format!("{}{path}", self.host))
    }

    fn post(&self, path: &str) -> anyhow::Result<reqwest::RequestBuilder> {
        let token = self
            .token
            .context("this command needs a session, pass --token or set FORUM_TOKEN")?;
        Ok(self
            .http
            .post(format!("{}{path}", self.host))
            .bearer_auth(token.0))
    }

    /// Returns the response body, `None` if the server answered with no content
    async fn send(&self, req: reqwest::RequestBuilder) -> anyhow::Result<Option<serde_json::Value>> {
        let resp = req.send().await.context("sending request to server")?;
        let status = resp.status();
        let body = resp.bytes().await.context("reading server response")?;
        if !status.is_success() {
            let err = forum_api::Error::parse(&body)
                .with_context(|| format!("server answered {status} with unknown body {body:?}"))?;
            return Err(err).with_context(|| format!("server answered {status}"));
        }
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            serde_json::from_slice(&body).context("parsing server response as json")?,
        ))
    }

    async fn vote(&self, post: u64, comment: Option<String>, vote: Vote) -> anyhow::Result<()> {
        let req = match comment {
            None => self.post(&format!("/api/post/{post}/vote"))?.json(&vote),
            Some(comment) => self
                .post(&format!("/api/post/{post}/comment/vote"))?
                .json(&CommentVote { comment, vote }),
        };
        print(self.send(req).await?)
    }
}

fn print(value: Option<serde_json::Value>) -> anyhow::Result<()> {
    if let Some(value) = value {
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("formatting server response")?
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = <Opt as structopt::StructOpt>::from_args();

    let client = Client {
        http: reqwest::Client::new(),
        host: opt.host.trim_end_matches('/').to_string(),
        token: opt.token.map(AuthToken),
    };

    match opt.cmd {
        Command::Register { name, password } => {
            let user = NewUser { name, password };
            user.validate()?;
            let req = client.http.post(format!("{}/api/register", client.host));
            print(client.send(req.json(&user)).await?)?;
        }
        Command::Login { name, password } => {
            let session = NewSession {
                user: name,
                password,
            };
            let req = client.http.post(format!("{}/api/auth", client.host));
            let token = client
                .send(req.json(&session))
                .await?
                .context("server returned no token")?;
            let token: AuthToken =
                serde_json::from_value(token).context("parsing returned token")?;
            println!("{}", token.0);
        }
        Command::Logout => {
            client.send(client.post("/api/unauth")?).await?;
        }
        Command::List { category, tags } => {
            let req = client
                .get("/api/posts")
                .query(&PostFilter { category, tags });
            print(client.send(req).await?)?;
        }
        Command::Popular => print(client.send(client.get("/api/popular-posts")).await?)?,
        Command::Show { post } => {
            print(client.send(client.get(&format!("/api/post/{post}"))).await?)?
        }
        Command::Post {
            title,
            content,
            tags,
            category,
        } => {
            let post = NewPost {
                title,
                content,
                tags,
                category,
            };
            post.validate()?;
            print(client.send(client.post("/api/posts")?.json(&post)).await?)?;
        }
        Command::Comment { post, text } => {
            let comment = NewComment { text };
            comment.validate()?;
            let req = client.post(&format!("/api/post/{post}/comment"))?;
            print(client.send(req.json(&comment)).await?)?;
        }
        Command::Reply { post, parent, text } => {
            let reply = NewReply { parent, text };
            reply.validate()?;
            reply.parent()?;
            let req = client.post(&format!("/api/post/{post}/reply"))?;
            print(client.send(req.json(&reply)).await?)?;
        }
        Command::Upvote { post, comment } => client.vote(post, comment, Vote::Up).await?,
        Command::Downvote { post, comment } => client.vote(post, comment, Vote::Down).await?,
        Command::DeletePost { post } => {
            client
                .send(client.post(&format!("/api/post/{post}/delete"))?)
                .await?;
        }
        Command::DeleteComment { post, comment } => {
            let target = CommentTarget { comment };
            target.target()?;
            let req = client.post(&format!("/api/post/{post}/comment/delete"))?;
            client.send(req.json(&target)).await?;
        }
        Command::Profile { name } => {
            print(client.send(client.get(&format!("/api/user/{name}"))).await?)?
        }
    }

    Ok(())
}
