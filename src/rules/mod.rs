//! Static rule data: roles, visibility tables, and per-size game plans.

pub mod plan;
pub mod role;

pub use plan::{plan_for, supported_sizes, GamePlan, RoundRule};
pub use role::{Role, EVIL_TEAM, MERLIN_SEES, PERCIVAL_SEES};
