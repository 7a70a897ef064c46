//! Per-roster-size rule configuration.
//!
//! A [`GamePlan`] fixes the role pool, the five round rules (fail votes
//! needed to fail the quest / required team size) and the round from which
//! the Lady of the Lake may be passed. Plans are static data; invariants
//! are asserted when the catalog is built, so a bad table is a startup
//! panic rather than a runtime error.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::core::error::GameError;
use crate::rules::role::Role;

/// Rules for a single quest round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundRule {
    /// Fail actions required to fail the quest.
    pub fail_threshold: usize,
    /// Required team size.
    pub team_size: usize,
}

/// Immutable configuration for one roster size.
#[derive(Clone, Debug)]
pub struct GamePlan {
    rounds: [RoundRule; 5],
    roles: Vec<Role>,
    lady_round: usize,
}

impl GamePlan {
    /// Round from which the Lady of the Lake becomes eligible, unless a
    /// plan overrides it.
    pub const DEFAULT_LADY_ROUND: usize = 2;

    fn new(rounds: [(usize, usize); 5], roles: &[Role]) -> Self {
        if roles.contains(&Role::Percival) {
            assert!(
                roles.contains(&Role::Merlin) && roles.contains(&Role::Morgana),
                "Percival requires both Merlin and Morgana in the pool"
            );
        }
        Self {
            rounds: rounds.map(|(fail_threshold, team_size)| RoundRule {
                fail_threshold,
                team_size,
            }),
            roles: roles.to_vec(),
            lady_round: Self::DEFAULT_LADY_ROUND,
        }
    }

    /// Rule for the 0-based round index, `None` past the fifth round.
    #[must_use]
    pub fn round(&self, index: usize) -> Option<RoundRule> {
        self.rounds.get(index).copied()
    }

    /// The full 5-round table.
    #[must_use]
    pub fn rounds(&self) -> &[RoundRule; 5] {
        &self.rounds
    }

    /// Role pool dealt to the roster; one entry per participant.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Roster size this plan is written for.
    #[must_use]
    pub fn roster_size(&self) -> usize {
        self.roles.len()
    }

    /// 1-based round count from which the Lady sub-game is eligible.
    #[must_use]
    pub fn lady_round(&self) -> usize {
        self.lady_round
    }
}

static PLANS: Lazy<BTreeMap<usize, GamePlan>> = Lazy::new(|| {
    use Role::{Assassin, Merlin, Minion, Mordred, Morgana, Oberon, Percival, Servant};

    let mut plans = BTreeMap::new();
    plans.insert(
        5,
        GamePlan::new(
            [(1, 2), (1, 3), (1, 2), (1, 3), (1, 3)],
            &[Servant, Servant, Merlin, Assassin, Mordred],
        ),
    );
    plans.insert(
        6,
        GamePlan::new(
            [(1, 2), (1, 3), (1, 4), (1, 3), (1, 4)],
            &[Servant, Servant, Percival, Merlin, Assassin, Morgana],
        ),
    );
    plans.insert(
        7,
        GamePlan::new(
            [(1, 2), (1, 3), (1, 3), (2, 4), (1, 4)],
            &[Servant, Servant, Servant, Merlin, Assassin, Minion, Minion],
        ),
    );
    plans.insert(
        8,
        GamePlan::new(
            [(1, 3), (1, 4), (1, 4), (2, 5), (1, 5)],
            &[Servant, Servant, Servant, Percival, Merlin, Assassin, Morgana, Mordred],
        ),
    );
    plans.insert(
        9,
        GamePlan::new(
            [(1, 3), (1, 4), (1, 4), (2, 5), (1, 5)],
            &[
                Servant, Servant, Servant, Servant, Percival, Merlin, Assassin, Morgana, Mordred,
            ],
        ),
    );
    plans.insert(
        10,
        GamePlan::new(
            [(1, 3), (1, 4), (1, 4), (2, 5), (1, 5)],
            &[
                Servant, Servant, Servant, Servant, Percival, Merlin, Assassin, Morgana, Minion,
                Oberon,
            ],
        ),
    );
    if cfg!(feature = "two-player-debug") {
        plans.insert(
            2,
            GamePlan::new(
                [(1, 1), (1, 1), (1, 1), (1, 1), (1, 1)],
                &[Merlin, Assassin],
            ),
        );
    }

    for (size, plan) in &plans {
        assert_eq!(
            plan.roster_size(),
            *size,
            "plan for {size} players must deal {size} roles"
        );
    }
    plans
});

/// Look up the plan for a roster size.
pub fn plan_for(roster_size: usize) -> Result<&'static GamePlan, GameError> {
    PLANS
        .get(&roster_size)
        .ok_or(GameError::UnsupportedRosterSize(roster_size))
}

/// Roster sizes with a registered plan, in ascending order.
pub fn supported_sizes() -> impl Iterator<Item = usize> {
    PLANS.keys().copied()
}
