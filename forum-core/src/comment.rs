use crate::{
    api::{CommentId, CommentPath, CommentRef, Time, UserId},
    Votes,
};

/// Deepest a comment can sit in its post's tree, top-level comments being at
/// depth 1
pub const MAX_COMMENT_DEPTH: usize = 32;

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author: UserId,

    /// Creation date, or date of the last edit if `edited` is set
    pub date: Time,
    pub edited: bool,

    /// Position of this comment when it was created. Not renumbered when an
    /// earlier sibling gets deleted, use `id` for a stable handle.
    pub path: CommentPath,

    pub votes: Votes,

    /// Child comments, in posting order
    pub replies: Vec<Comment>,
}

impl Comment {
    pub(crate) fn new(
        id: CommentId,
        path: CommentPath,
        text: String,
        author: UserId,
        date: Time,
    ) -> Comment {
        Comment {
            id,
            text,
            author,
            date,
            edited: false,
            path,
            votes: Votes::new(),
            replies: Vec::new(),
        }
    }

    pub fn score(&self) -> i64 {
        self.votes.score()
    }

    pub(crate) fn add_reply(
        &mut self,
        id: CommentId,
        text: String,
        author: UserId,
        date: Time,
    ) -> &Comment {
        let path = self.path.child(self.replies.len());
        self.replies.push(Comment::new(id, path, text, author, date));
        &self.replies[self.replies.len() - 1]
    }

    pub(crate) fn edit(&mut self, text: String, date: Time) {
        self.text = text;
        self.date = date;
        self.edited = true;
    }

    /// Follows the sibling indices of `path` starting from `roots`
    pub fn find_by_path<'a>(roots: &'a [Comment], path: &CommentPath) -> Option<&'a Comment> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = roots.get(*first)?;
        for &i in rest {
            current = current.replies.get(i)?;
        }
        Some(current)
    }

    pub fn find_by_path_mut<'a>(
        roots: &'a mut [Comment],
        path: &CommentPath,
    ) -> Option<&'a mut Comment> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = roots.get_mut(*first)?;
        for &i in rest {
            current = current.replies.get_mut(i)?;
        }
        Some(current)
    }

    pub fn find_by_id<'a>(roots: &'a [Comment], id: CommentId) -> Option<&'a Comment> {
        let mut stack = roots.iter().collect::<Vec<_>>();
        while let Some(c) = stack.pop() {
            if c.id == id {
                return Some(c);
            }
            stack.extend(c.replies.iter());
        }
        None
    }

    pub fn find_by_id_mut<'a>(roots: &'a mut [Comment], id: CommentId) -> Option<&'a mut Comment> {
        let mut stack = roots.iter_mut().collect::<Vec<_>>();
        while let Some(c) = stack.pop() {
            if c.id == id {
                return Some(c);
            }
            stack.extend(c.replies.iter_mut());
        }
        None
    }

    pub fn find<'a>(roots: &'a [Comment], target: &CommentRef) -> Option<&'a Comment> {
        match target {
            CommentRef::Path(path) => Comment::find_by_path(roots, path),
            CommentRef::Id(id) => Comment::find_by_id(roots, *id),
        }
    }

    pub fn find_mut<'a>(roots: &'a mut [Comment], target: &CommentRef) -> Option<&'a mut Comment> {
        match target {
            CommentRef::Path(path) => Comment::find_by_path_mut(roots, path),
            CommentRef::Id(id) => Comment::find_by_id_mut(roots, *id),
        }
    }

    /// Removes the targeted comment, along with all its replies, from its
    /// sibling list
    pub(crate) fn remove(roots: &mut Vec<Comment>, target: &CommentRef) -> Option<Comment> {
        match target {
            CommentRef::Path(path) => {
                let (parent, index) = path.split_last();
                let siblings = match parent {
                    None => roots,
                    Some(parent) => &mut Comment::find_by_path_mut(roots, &parent)?.replies,
                };
                if index >= siblings.len() {
                    return None;
                }
                let removed = siblings.remove(index);
                if index < siblings.len() {
                    tracing::debug!(
                        %path,
                        num_shifted = siblings.len() - index,
                        "removed comment, later siblings keep their creation-time paths"
                    );
                }
                Some(removed)
            }
            CommentRef::Id(id) => Comment::remove_by_id(roots, *id),
        }
    }

    fn remove_by_id(roots: &mut Vec<Comment>, id: CommentId) -> Option<Comment> {
        let mut stack = vec![roots];
        while let Some(siblings) = stack.pop() {
            if let Some(pos) = siblings.iter().position(|c| c.id == id) {
                return Some(siblings.remove(pos));
            }
            stack.extend(siblings.iter_mut().map(|c| &mut c.replies));
        }
        None
    }

    /// Lists `roots` and all their replies, depth-first, each comment
    /// before its replies
    pub fn walk(roots: &[Comment]) -> Vec<&Comment> {
        let mut res = Vec::new();
        let mut stack = roots.iter().rev().collect::<Vec<_>>();
        while let Some(c) = stack.pop() {
            res.push(c);
            stack.extend(c.replies.iter().rev());
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::api::Uuid;

    fn path(s: &str) -> CommentPath {
        s.parse().unwrap()
    }

    fn comment(id: u64, p: &str) -> Comment {
        Comment::new(
            CommentId(id),
            path(p),
            format!("comment {p}"),
            UserId(Uuid::from_u128(1)),
            Utc::now(),
        )
    }

    // 0
    // ├── 0-0
    // │   └── 0-0-0
    // └── 0-1
    // 1
    fn tree() -> Vec<Comment> {
        let mut first = comment(0, "0");
        first.add_reply(CommentId(2), String::from("comment 0-0"), UserId::stub(), Utc::now());
        first.add_reply(CommentId(3), String::from("comment 0-1"), UserId::stub(), Utc::now());
        first.replies[0].add_reply(
            CommentId(4),
            String::from("comment 0-0-0"),
            UserId::stub(),
            Utc::now(),
        );
        vec![first, comment(1, "1")]
    }

    #[test]
    fn resolve_paths() {
        let roots = tree();
        assert_eq!(Comment::find_by_path(&roots, &path("0")).unwrap().id, CommentId(0));
        assert_eq!(Comment::find_by_path(&roots, &path("1")).unwrap().id, CommentId(1));
        assert_eq!(Comment::find_by_path(&roots, &path("0-0")).unwrap().id, CommentId(2));
        assert_eq!(Comment::find_by_path(&roots, &path("0-1")).unwrap().id, CommentId(3));
        assert_eq!(
            Comment::find_by_path(&roots, &path("0-0-0")).unwrap().id,
            CommentId(4)
        );
        assert!(Comment::find_by_path(&roots, &path("5")).is_none());
        assert!(Comment::find_by_path(&roots, &path("0-2")).is_none());
        assert!(Comment::find_by_path(&roots, &path("1-0")).is_none());
        assert!(Comment::find_by_path(&roots, &path("0-0-0-0")).is_none());
        assert!(Comment::find_by_path(&[], &path("0")).is_none());
    }

    #[test]
    fn reply_paths() {
        let roots = tree();
        for c in Comment::walk(&roots) {
            assert_eq!(
                Comment::find_by_path(&roots, &c.path).map(|c| c.id),
                Some(c.id),
                "path {} does not lead back to its comment",
                c.path,
            );
        }
        let mut reply_parent = comment(7, "0-1");
        let reply = reply_parent.add_reply(CommentId(8), String::new(), UserId::stub(), Utc::now());
        assert_eq!(reply.path, path("0-1-0"));
        assert!(reply.replies.is_empty());
        assert_eq!(reply.score(), 0);
    }

    #[test]
    fn resolve_ids() {
        let mut roots = tree();
        assert_eq!(
            Comment::find_by_id(&roots, CommentId(4)).unwrap().path,
            path("0-0-0")
        );
        assert!(Comment::find_by_id(&roots, CommentId(42)).is_none());
        Comment::find_by_id_mut(&mut roots, CommentId(3))
            .unwrap()
            .edit(String::from("edited"), Utc::now());
        let edited = Comment::find(&roots, &CommentRef::Path(path("0-1"))).unwrap();
        assert_eq!(edited.text, "edited");
        assert!(edited.edited);
    }

    #[test]
    fn walk_order() {
        let roots = tree();
        let ids = Comment::walk(&roots)
            .into_iter()
            .map(|c| c.id.0)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![0, 2, 4, 3, 1]);
    }

    #[test]
    fn remove_by_path_keeps_stale_paths() {
        let mut roots = vec![comment(0, "0"), comment(1, "1"), comment(2, "2")];
        let removed = Comment::remove(&mut roots, &CommentRef::Path(path("0"))).unwrap();
        assert_eq!(removed.id, CommentId(0));
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].id, CommentId(1));
        assert_eq!(roots[0].path, path("1"));
        assert_eq!(roots[1].id, CommentId(2));
        assert_eq!(roots[1].path, path("2"));
        // the stored path of the last comment now leads nowhere
        assert!(Comment::find_by_path(&roots, &roots[1].path).is_none());
    }

    #[test]
    fn remove_nested() {
        let mut roots = tree();
        let removed = Comment::remove(&mut roots, &CommentRef::Path(path("0-0"))).unwrap();
        assert_eq!(removed.id, CommentId(2));
        assert_eq!(removed.replies.len(), 1);
        assert!(Comment::find_by_id(&roots, CommentId(4)).is_none());
        assert_eq!(roots[0].replies.len(), 1);

        let removed = Comment::remove(&mut roots, &CommentRef::Id(CommentId(3))).unwrap();
        assert_eq!(removed.path, path("0-1"));
        assert!(roots[0].replies.is_empty());

        assert!(Comment::remove(&mut roots, &CommentRef::Path(path("0-0"))).is_none());
        assert!(Comment::remove(&mut roots, &CommentRef::Path(path("7"))).is_none());
        assert!(Comment::remove(&mut roots, &CommentRef::Id(CommentId(3))).is_none());
        assert_eq!(roots.len(), 2);
    }

    #[test]
    fn deep_chains_by_id() {
        let mut roots = vec![comment(0, "0")];
        let mut parent = &mut roots[0];
        for id in 1..=MAX_COMMENT_DEPTH as u64 {
            parent.add_reply(CommentId(id), String::new(), UserId::stub(), Utc::now());
            parent = &mut parent.replies[0];
        }
        let last = CommentId(MAX_COMMENT_DEPTH as u64);
        assert_eq!(
            Comment::find_by_id(&roots, last).unwrap().path.depth(),
            MAX_COMMENT_DEPTH + 1
        );
        Comment::find_by_id_mut(&mut roots, last)
            .unwrap()
            .edit(String::from("bottom"), Utc::now());
        let removed = Comment::remove(&mut roots, &CommentRef::Id(last)).unwrap();
        assert_eq!(removed.text, "bottom");
        assert!(Comment::find_by_id(&roots, last).is_none());
        assert_eq!(Comment::walk(&roots).len(), MAX_COMMENT_DEPTH);
    }
}
