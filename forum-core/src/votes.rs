use std::collections::HashMap;

use crate::api::{UserId, Vote};

/// What casting a vote does, given the actor's previous vote on the same entity
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VoteTransition {
    /// No previous vote
    Fresh,

    /// Previous vote was in the other direction
    Switch,

    /// Same vote cast again, which cancels it
    ToggleOff,
}

impl VoteTransition {
    pub fn compute(previous: Option<Vote>, vote: Vote) -> VoteTransition {
        match previous {
            None => VoteTransition::Fresh,
            Some(previous) if previous == vote => VoteTransition::ToggleOff,
            Some(_) => VoteTransition::Switch,
        }
    }

    pub fn score_delta(self, vote: Vote) -> i64 {
        match self {
            VoteTransition::Fresh => vote.direction(),
            VoteTransition::Switch => 2 * vote.direction(),
            VoteTransition::ToggleOff => -vote.direction(),
        }
    }
}

/// Score of a post or comment along with who voted for it.
///
/// The score is always the sum of the recorded vote directions.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Votes {
    score: i64,
    voters: HashMap<UserId, Vote>,
}

impl Votes {
    pub fn new() -> Votes {
        Votes::default()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn vote_of(&self, actor: &UserId) -> Option<Vote> {
        self.voters.get(actor).copied()
    }

    pub fn num_voters(&self) -> usize {
        self.voters.len()
    }

    pub fn cast(&mut self, actor: UserId, vote: Vote) -> VoteTransition {
        let transition = VoteTransition::compute(self.vote_of(&actor), vote);
        self.score += transition.score_delta(vote);
        match transition {
            VoteTransition::ToggleOff => {
                self.voters.remove(&actor);
            }
            VoteTransition::Fresh | VoteTransition::Switch => {
                self.voters.insert(actor, vote);
            }
        }
        transition
    }
}
