mod auth;
pub use auth::{AuthToken, NewSession};

mod comment;
pub use comment::{
    CommentEdit, CommentId, CommentPath, CommentRef, CommentTarget, CommentVote, NewComment,
    NewReply,
};

mod error;
pub use error::Error;

mod post;
pub use post::{parse_tags, Category, NewPost, PostEdit, PostFilter, PostId};

mod user;
pub use user::{NewUser, User, UserId};

mod vote;
pub use vote::Vote;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<chrono::Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

pub fn validate_string(s: &str) -> Result<(), Error> {
    if s.contains('\0') {
        return Err(Error::NullByteInString(String::from(s)));
    }
    Ok(())
}
