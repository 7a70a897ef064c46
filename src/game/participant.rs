//! A single player's per-round state.

use serde::{Deserialize, Serialize};

use crate::core::error::GameError;
use crate::core::identity::verify_identity;
use crate::rules::role::Role;

/// One player in a game.
///
/// The identity is validated at construction and never changes; role, vote
/// and quest action are dealt and reset by the owning [`Game`](crate::game::Game).
/// Equality is by identity only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Participant {
    identity: String,
    /// Hidden role, absent until roles are dealt.
    pub role: Option<Role>,
    /// Current team vote. `None` = not voted.
    pub vote: Option<bool>,
    /// Current quest action. `None` = not cast.
    pub quest_action: Option<bool>,
}

impl Participant {
    pub fn new(identity: impl Into<String>) -> Result<Self, GameError> {
        let identity = identity.into();
        verify_identity(&identity)?;
        Ok(Self {
            identity,
            role: None,
            vote: None,
            quest_action: None,
        })
    }

    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Toggle the team vote: same value twice clears it back to unset.
    pub fn cast_vote(&mut self, approve: bool) {
        self.vote = if self.vote == Some(approve) {
            None
        } else {
            Some(approve)
        };
    }

    /// Toggle the quest action, same tri-state rule as [`cast_vote`](Self::cast_vote).
    pub fn cast_quest_action(&mut self, success: bool) {
        self.quest_action = if self.quest_action == Some(success) {
            None
        } else {
            Some(success)
        };
    }

    /// Display text for the current team vote.
    #[must_use]
    pub fn current_vote_text(&self) -> &'static str {
        match self.vote {
            None => "Not voted",
            Some(true) => "Approved",
            Some(false) => "Rejected",
        }
    }

    /// Display text for the current quest action.
    #[must_use]
    pub fn current_quest_action_text(&self) -> &'static str {
        match self.quest_action {
            None => "Nothing",
            Some(true) => "Success",
            Some(false) => "Fail",
        }
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Participant {}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.identity)
    }
}
