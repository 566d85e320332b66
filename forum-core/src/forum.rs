use std::collections::BTreeMap;

use crate::{
    api::{
        CommentId, CommentPath, CommentRef, Error, NewPost, PostEdit, PostFilter, PostId, Time,
        User, UserId, Vote,
    },
    Comment, FilterExt, PopularityIndex, Post,
};

/// Number of posts and comments shown on a user's profile
pub const NUM_LATEST_ACTIVITY: usize = 3;

/// All the posts of the forum, with their comment trees.
///
/// Every operation either succeeds or leaves the forum untouched.
#[derive(Clone, Debug, Default)]
pub struct Forum {
    // PostIds are allocated in increasing order, so this iterates in creation order
    posts: BTreeMap<PostId, Post>,
    next_post_id: u64,
    popular: PopularityIndex,
}

/// A comment listed outside of its post's tree
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AuthoredComment {
    pub post_id: PostId,
    pub post_title: String,
    pub comment_id: CommentId,
    pub path: CommentPath,
    pub text: String,
    pub date: Time,
    pub score: i64,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Profile {
    pub user: User,

    /// Most recent last
    pub latest_posts: Vec<Post>,

    /// Most recent last
    pub latest_comments: Vec<AuthoredComment>,
}

impl Forum {
    pub fn new() -> Forum {
        Forum::default()
    }

    pub fn posts(&self) -> impl '_ + Iterator<Item = &Post> {
        self.posts.values()
    }

    pub fn num_posts(&self) -> usize {
        self.posts.len()
    }

    pub fn post(&self, id: PostId) -> Result<&Post, Error> {
        self.posts.get(&id).ok_or(Error::NotFound)
    }

    fn post_mut(&mut self, id: PostId) -> Result<&mut Post, Error> {
        self.posts.get_mut(&id).ok_or(Error::NotFound)
    }

    fn refresh_popular(&mut self) {
        self.popular.recompute(self.posts.values());
    }

    pub fn create_post(&mut self, p: NewPost, author: UserId, date: Time) -> &Post {
        let id = PostId(self.next_post_id);
        self.next_post_id += 1;
        self.posts.insert(id, Post::new(id, p, author, date));
        self.refresh_popular();
        &self.posts[&id]
    }

    pub fn edit_post(&mut self, id: PostId, e: PostEdit) -> Result<&Post, Error> {
        let post = self.post_mut(id)?;
        post.edit(e);
        Ok(&*post)
    }

    pub fn delete_post(&mut self, id: PostId) -> Result<Post, Error> {
        let post = self.posts.remove(&id).ok_or(Error::NotFound)?;
        self.refresh_popular();
        Ok(post)
    }

    pub fn add_comment(
        &mut self,
        post: PostId,
        text: String,
        author: UserId,
        date: Time,
    ) -> Result<&Comment, Error> {
        Ok(self.post_mut(post)?.add_comment(text, author, date))
    }

    pub fn add_reply(
        &mut self,
        post: PostId,
        parent: &CommentPath,
        text: String,
        author: UserId,
        date: Time,
    ) -> Result<&Comment, Error> {
        self.post_mut(post)?.add_reply(parent, text, author, date)
    }

    /// Returns the new score of the post
    pub fn vote_on_post(
        &mut self,
        post: PostId,
        actor: Option<UserId>,
        vote: Vote,
    ) -> Result<i64, Error> {
        let post = self.post_mut(post)?;
        let actor = actor.ok_or(Error::Unauthenticated)?;
        let score = post.vote(actor, vote);
        self.refresh_popular();
        Ok(score)
    }

    /// Returns the new score of the comment. Comment scores do not influence
    /// post popularity.
    pub fn vote_on_comment(
        &mut self,
        post: PostId,
        target: &CommentRef,
        actor: Option<UserId>,
        vote: Vote,
    ) -> Result<i64, Error> {
        let post = self.post_mut(post)?;
        let actor = actor.ok_or(Error::Unauthenticated)?;
        post.vote_on_comment(target, actor, vote)
    }

    pub fn edit_comment(
        &mut self,
        post: PostId,
        target: &CommentRef,
        text: String,
        date: Time,
    ) -> Result<(), Error> {
        self.post_mut(post)?.edit_comment(target, text, date)
    }

    pub fn delete_comment(&mut self, post: PostId, target: &CommentRef) -> Result<Comment, Error> {
        self.post_mut(post)?.delete_comment(target)
    }

    pub fn filter_posts(&self, filter: &PostFilter) -> Vec<&Post> {
        self.posts().filter(|p| filter.matches(p)).collect()
    }

    pub fn popularity(&self) -> &PopularityIndex {
        &self.popular
    }

    /// Best first
    pub fn popular_posts(&self) -> Vec<&Post> {
        self.popular
            .ids()
            .filter_map(|id| {
                let post = self.posts.get(&id);
                if post.is_none() {
                    tracing::warn!(?id, "popularity index references a missing post");
                }
                post
            })
            .collect()
    }

    pub fn posts_by(&self, author: &UserId) -> Vec<&Post> {
        self.posts().filter(|p| p.author == *author).collect()
    }

    /// Comments at any depth, listed post by post and depth-first in each post
    pub fn comments_by(&self, author: &UserId) -> Vec<AuthoredComment> {
        self.posts()
            .flat_map(|p| {
                Comment::walk(&p.comments)
                    .into_iter()
                    .filter(move |c| c.author == *author)
                    .map(move |c| AuthoredComment {
                        post_id: p.id,
                        post_title: p.title.clone(),
                        comment_id: c.id,
                        path: c.path.clone(),
                        text: c.text.clone(),
                        date: c.date,
                        score: c.score(),
                    })
            })
            .collect()
    }

    pub fn profile(&self, user: User) -> Profile {
        let posts = self.posts_by(&user.id);
        let comments = self.comments_by(&user.id);
        Profile {
            latest_posts: posts[posts.len().saturating_sub(NUM_LATEST_ACTIVITY)..]
                .iter()
                .map(|&p| p.clone())
                .collect(),
            latest_comments: comments[comments.len().saturating_sub(NUM_LATEST_ACTIVITY)..]
                .to_vec(),
            user,
        }
    }
}
