//! Roles and role visibility.
//!
//! The role set is fixed and exhaustive, so everything here is a match over
//! a closed enum plus const lookup tables. Visibility is deliberately
//! asymmetric: Mordred is hidden from Merlin, Oberon is hidden from his own
//! teammates (and sees none of them).

use serde::{Deserialize, Serialize};

/// A participant's hidden role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Merlin,
    Percival,
    Servant,
    Mordred,
    Assassin,
    Morgana,
    Minion,
    Oberon,
}

/// Roles Merlin is shown as evil. Mordred is missing on purpose.
pub const MERLIN_SEES: [Role; 3] = [Role::Minion, Role::Morgana, Role::Assassin];

/// Roles Percival cannot tell apart.
pub const PERCIVAL_SEES: [Role; 2] = [Role::Merlin, Role::Morgana];

/// Roles shown to evil participants as teammates. Oberon is excluded.
pub const EVIL_TEAM: [Role; 4] = [Role::Minion, Role::Morgana, Role::Assassin, Role::Mordred];

impl Role {
    /// Whether this role plays for the evil faction.
    #[must_use]
    pub const fn is_evil(self) -> bool {
        !matches!(self, Role::Merlin | Role::Percival | Role::Servant)
    }

    /// Fixed display glyph.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Role::Merlin => "🎅🏻",
            Role::Percival => "🏇",
            Role::Servant => "🤵",
            Role::Mordred => "🎩",
            Role::Assassin => "☠️",
            Role::Morgana => "🦹‍♀️",
            Role::Minion => "💀",
            Role::Oberon => "👹",
        }
    }

    /// Role name as shown to players.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Role::Merlin => "Merlin",
            Role::Percival => "Percival",
            Role::Servant => "Servant",
            Role::Mordred => "Mordred",
            Role::Assassin => "Assassin",
            Role::Morgana => "Morgana",
            Role::Minion => "Minion",
            Role::Oberon => "Oberon",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
