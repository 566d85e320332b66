mod comment;
pub use comment::{Comment, MAX_COMMENT_DEPTH};

mod filter;
pub use filter::FilterExt;

mod forum;
pub use forum::{AuthoredComment, Forum, Profile, NUM_LATEST_ACTIVITY};

mod popular;
pub use popular::{PopularityIndex, NUM_POPULAR_POSTS};

mod post;
pub use post::Post;

mod votes;
pub use votes::{VoteTransition, Votes};

pub mod api {
    pub use forum_api::*;
}

pub mod prelude {
    pub use crate::FilterExt;
}
