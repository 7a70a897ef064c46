//! Error taxonomy for the rules engine.
//!
//! Every public `Game` operation either completes with a defined return
//! value or fails with exactly one of these variants before touching any
//! state. Plan-catalog misconfiguration is the one fatal case and is
//! asserted at catalog construction instead of surfacing here.

use thiserror::Error;

use crate::game::GamePhase;

pub type Result<T> = std::result::Result<T, GameError>;

/// Caller-recoverable validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Operation invoked outside its required phase.
    #[error("this action is not available in the {actual:?} phase")]
    InvalidPhase {
        expected: GamePhase,
        actual: GamePhase,
    },

    #[error("only the king can do this")]
    OnlyKingCanDo,

    #[error("only the lady can do this")]
    OnlyLadyCanDo,

    #[error("only the assassin can do this")]
    OnlyAssassinCanDo,

    #[error("{0} has already joined this game")]
    AlreadyJoined(String),

    #[error("{0} has not joined this game")]
    NotJoined(String),

    #[error("unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("game should have 5 to 10 participants, got {0}")]
    UnsupportedRosterSize(usize),

    #[error("please select correct number of team members: need {expected}, got {actual}")]
    WrongTeamSize { expected: usize, actual: usize },

    #[error("you are not a member of this quest")]
    NotOnTeam,

    #[error("cannot pass lady to: {0}")]
    IneligibleLady(String),

    #[error("evils cannot be Merlin")]
    EvilMerlinGuess,

    /// The round implied by the recorded results has no entry in the plan.
    #[error("no rule for round {0}")]
    NoSuchRound(usize),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("snapshot serialization error: {0}")]
    Serialization(String),

    #[error("could not acquire lock for game {0}")]
    LockTimeout(String),
}

impl From<bincode::Error> for GameError {
    fn from(err: bincode::Error) -> Self {
        GameError::Serialization(err.to_string())
    }
}

#[cfg(feature = "redis-store")]
impl From<redis::RedisError> for GameError {
    fn from(err: redis::RedisError) -> Self {
        GameError::Storage(err.to_string())
    }
}
