use crate::{
    api::{
        self, Category, CommentId, CommentPath, CommentRef, Error, NewPost, PostEdit, PostId, Time,
        UserId, Vote,
    },
    Comment, Votes, MAX_COMMENT_DEPTH,
};

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author: UserId,
    pub date: Time,
    pub category: Category,
    pub tags: Vec<String>,
    pub votes: Votes,

    /// Top-level comments, in posting order
    pub comments: Vec<Comment>,

    next_comment_id: u64,
}

impl Post {
    pub(crate) fn new(id: PostId, p: NewPost, author: UserId, date: Time) -> Post {
        Post {
            id,
            title: p.title,
            content: p.content,
            author,
            date,
            category: Category::from_form(p.category.as_deref()),
            tags: api::parse_tags(p.tags.as_deref()),
            votes: Votes::new(),
            comments: Vec::new(),
            next_comment_id: 0,
        }
    }

    pub fn score(&self) -> i64 {
        self.votes.score()
    }

    pub fn comment(&self, target: &CommentRef) -> Option<&Comment> {
        Comment::find(&self.comments, target)
    }

    pub fn num_comments(&self) -> usize {
        Comment::walk(&self.comments).len()
    }

    pub(crate) fn edit(&mut self, e: PostEdit) {
        self.title = e.title;
        self.content = e.content;
        self.tags = api::parse_tags(e.tags.as_deref());
    }

    pub fn vote(&mut self, actor: UserId, vote: Vote) -> i64 {
        self.votes.cast(actor, vote);
        self.score()
    }

    pub fn add_comment(&mut self, text: String, author: UserId, date: Time) -> &Comment {
        let id = CommentId(self.next_comment_id);
        self.next_comment_id += 1;
        let path = CommentPath::root(self.comments.len());
        self.comments.push(Comment::new(id, path, text, author, date));
        &self.comments[self.comments.len() - 1]
    }

    pub fn add_reply(
        &mut self,
        parent: &CommentPath,
        text: String,
        author: UserId,
        date: Time,
    ) -> Result<&Comment, Error> {
        let parent =
            Comment::find_by_path_mut(&mut self.comments, parent).ok_or(Error::ParentNotFound)?;
        if parent.path.depth() >= MAX_COMMENT_DEPTH {
            return Err(Error::ReplyTooDeep(MAX_COMMENT_DEPTH));
        }
        let id = CommentId(self.next_comment_id);
        self.next_comment_id += 1;
        Ok(parent.add_reply(id, text, author, date))
    }

    pub fn vote_on_comment(
        &mut self,
        target: &CommentRef,
        actor: UserId,
        vote: Vote,
    ) -> Result<i64, Error> {
        let comment = Comment::find_mut(&mut self.comments, target).ok_or(Error::NotFound)?;
        comment.votes.cast(actor, vote);
        Ok(comment.score())
    }

    pub fn edit_comment(&mut self, target: &CommentRef, text: String, date: Time) -> Result<(), Error> {
        Comment::find_mut(&mut self.comments, target)
            .ok_or(Error::NotFound)?
            .edit(text, date);
        Ok(())
    }

    pub fn delete_comment(&mut self, target: &CommentRef) -> Result<Comment, Error> {
        Comment::remove(&mut self.comments, target).ok_or(Error::NotFound)
    }
}
