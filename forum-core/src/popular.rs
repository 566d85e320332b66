use std::cmp::Reverse;

use crate::{api::PostId, Post};

pub const NUM_POPULAR_POSTS: usize = 3;

/// The highest-scored posts, best first
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PopularityIndex {
    ranking: Vec<(PostId, i64)>,
}

impl PopularityIndex {
    pub fn new() -> PopularityIndex {
        PopularityIndex::default()
    }

    /// Posts with equal scores keep the order in which `posts` lists them
    pub fn recompute<'a>(&mut self, posts: impl IntoIterator<Item = &'a Post>) {
        let mut ranking = posts
            .into_iter()
            .map(|p| (p.id, p.score()))
            .collect::<Vec<_>>();
        ranking.sort_by_key(|&(_, score)| Reverse(score));
        ranking.truncate(NUM_POPULAR_POSTS);
        self.ranking = ranking;
    }

    /// Post ids along with their score at the time of the last recomputation
    pub fn ranking(&self) -> &[(PostId, i64)] {
        &self.ranking
    }

    pub fn ids(&self) -> impl '_ + Iterator<Item = PostId> {
        self.ranking.iter().map(|(id, _)| *id)
    }
}
