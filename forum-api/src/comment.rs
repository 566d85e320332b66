use std::{fmt, str::FromStr};

use crate::{Error, Vote};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a comment in its post's tree, as the list of sibling indices
/// to follow from the post's top-level comments.
///
/// Written as dash-separated decimal indices: `"0-2-1"` is the second reply
/// of the third reply of the first top-level comment. Never empty.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentPath(Vec<usize>);

impl CommentPath {
    pub fn root(index: usize) -> CommentPath {
        CommentPath(vec![index])
    }

    pub fn child(&self, index: usize) -> CommentPath {
        let mut indices = self.0.clone();
        indices.push(index);
        CommentPath(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns the path of the parent (`None` for a top-level comment) and the
    /// index of this comment among its siblings
    pub fn split_last(&self) -> (Option<CommentPath>, usize) {
        match self.0.split_last() {
            Some((&last, [])) => (None, last),
            Some((&last, parent)) => (Some(CommentPath(parent.to_vec())), last),
            None => unreachable!("CommentPath is never empty"),
        }
    }
}

impl FromStr for CommentPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<CommentPath, Error> {
        let invalid = || Error::InvalidPath(String::from(s));
        if s.is_empty() {
            return Err(invalid());
        }
        s.split('-')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                segment.parse::<usize>().map_err(|_| invalid())
            })
            .collect::<Result<Vec<_>, _>>()
            .map(CommentPath)
    }
}

impl fmt::Display for CommentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut indices = self.0.iter();
        if let Some(first) = indices.next() {
            write!(f, "{first}")?;
        }
        for i in indices {
            write!(f, "-{i}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for CommentPath {
    type Error = Error;

    fn try_from(s: String) -> Result<CommentPath, Error> {
        s.parse()
    }
}

impl From<CommentPath> for String {
    fn from(p: CommentPath) -> String {
        p.to_string()
    }
}

/// Either the position of a comment or its stable id.
///
/// Paths are recorded at creation time and go stale once an earlier sibling
/// gets deleted; ids never do.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum CommentRef {
    Path(CommentPath),
    Id(CommentId),
}

impl FromStr for CommentRef {
    type Err = Error;

    /// `"id:17"` is an id, anything else must be a path
    fn from_str(s: &str) -> Result<CommentRef, Error> {
        match s.strip_prefix("id:") {
            Some(id) => id
                .parse()
                .map(|id| CommentRef::Id(CommentId(id)))
                .map_err(|_| Error::InvalidPath(String::from(s))),
            None => s.parse().map(CommentRef::Path),
        }
    }
}

impl fmt::Display for CommentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentRef::Path(p) => write!(f, "{p}"),
            CommentRef::Id(id) => write!(f, "id:{id}"),
        }
    }
}

impl TryFrom<String> for CommentRef {
    type Error = Error;

    fn try_from(s: String) -> Result<CommentRef, Error> {
        s.parse()
    }
}

impl From<CommentRef> for String {
    fn from(r: CommentRef) -> String {
        r.to_string()
    }
}

impl From<CommentPath> for CommentRef {
    fn from(p: CommentPath) -> CommentRef {
        CommentRef::Path(p)
    }
}

impl From<CommentId> for CommentRef {
    fn from(id: CommentId) -> CommentRef {
        CommentRef::Id(id)
    }
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub text: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.text)
    }
}

// Paths travel as plain strings in request bodies, so that a malformed one is
// reported as `InvalidPath` and not as an undecodable body.

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct NewReply {
    pub parent: String,
    pub text: String,
}

impl NewReply {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.text)
    }

    pub fn parent(&self) -> Result<CommentPath, Error> {
        self.parent.parse()
    }
}

/// Names one comment of a post, either as a path or as `"id:N"`
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct CommentTarget {
    pub comment: String,
}

impl CommentTarget {
    pub fn target(&self) -> Result<CommentRef, Error> {
        self.comment.parse()
    }
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct CommentVote {
    pub comment: String,
    pub vote: Vote,
}

impl CommentVote {
    pub fn target(&self) -> Result<CommentRef, Error> {
        self.comment.parse()
    }
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct CommentEdit {
    pub comment: String,
    pub text: String,
}

impl CommentEdit {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.text)
    }

    pub fn target(&self) -> Result<CommentRef, Error> {
        self.comment.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> CommentPath {
        s.parse().unwrap()
    }

    #[test]
    fn parse_paths() {
        assert_eq!(path("0").indices(), &[0]);
        assert_eq!(path("0-2-1").indices(), &[0, 2, 1]);
        assert_eq!(path("12-0").indices(), &[12, 0]);
        assert_eq!(path("0-2-1").to_string(), "0-2-1");
    }

    #[test]
    fn reject_bad_paths() {
        for bad in ["", "-", "0-", "-0", "1--2", "a", "0-b", "+1", "1.5", " 1"] {
            assert_eq!(
                bad.parse::<CommentPath>(),
                Err(Error::InvalidPath(String::from(bad))),
                "{bad:?} should not be a valid path",
            );
        }
    }

    #[test]
    fn children_and_parents() {
        let p = path("0-1");
        assert_eq!(p.child(0), path("0-1-0"));
        assert_eq!(p.split_last(), (Some(path("0")), 1));
        assert_eq!(path("3").split_last(), (None, 3));
        assert_eq!(p.depth(), 2);
    }

    #[test]
    fn comment_refs() {
        assert_eq!(
            "0-1".parse::<CommentRef>(),
            Ok(CommentRef::Path(path("0-1")))
        );
        assert_eq!(
            "id:17".parse::<CommentRef>(),
            Ok(CommentRef::Id(CommentId(17)))
        );
        assert_eq!(
            "id:x".parse::<CommentRef>(),
            Err(Error::InvalidPath(String::from("id:x")))
        );
        assert_eq!(CommentRef::Id(CommentId(4)).to_string(), "id:4");
    }

    #[test]
    fn path_is_a_json_string() {
        assert_eq!(serde_json::to_string(&path("0-2")).unwrap(), r#""0-2""#);
        assert_eq!(
            serde_json::from_str::<CommentPath>(r#""4-0""#).unwrap(),
            path("4-0")
        );
        assert!(serde_json::from_str::<CommentPath>(r#""""#).is_err());
        assert_eq!(
            serde_json::to_string(&CommentRef::Id(CommentId(2))).unwrap(),
            r#""id:2""#
        );
    }

    #[test]
    fn request_targets() {
        let reply = NewReply {
            parent: String::from("1-0"),
            text: String::from("hi"),
        };
        assert_eq!(reply.parent(), Ok(path("1-0")));
        let vote = CommentVote {
            comment: String::from("1-x"),
            vote: Vote::Up,
        };
        assert_eq!(vote.target(), Err(Error::InvalidPath(String::from("1-x"))));
        let target = CommentTarget {
            comment: String::from("id:5"),
        };
        assert_eq!(target.target(), Ok(CommentRef::Id(CommentId(5))));
    }
}
