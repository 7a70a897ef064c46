//! # avalon-engine
//!
//! An authoritative rules engine for Avalon-style hidden-role games with
//! 5-10 participants.
//!
//! ## Design Principles
//!
//! 1. **One writer per game**: the engine holds no concurrency primitives.
//!    Callers serialize mutation through the per-game lock in `store`.
//!
//! 2. **All-or-nothing operations**: every public `Game` operation
//!    validates before it mutates, so a failed call never leaves a game
//!    half-changed.
//!
//! 3. **Data over subclassing**: roles, visibility and per-size plans are
//!    closed enums and const tables, checked exhaustively at compile time
//!    or at catalog construction.
//!
//! 4. **Uniform randomness**: role deals and seat draws use a uniform
//!    shuffle/sample so no hidden role is predictable.
//!
//! ## Modules
//!
//! - `core`: identity validation, RNG, error taxonomy
//! - `rules`: roles, visibility tables, per-size game plans
//! - `game`: participants and the `Game` phase machine
//! - `store`: snapshot persistence and per-game locking

pub mod core;
pub mod game;
pub mod rules;
pub mod store;

// Re-export commonly used types
pub use crate::core::{verify_identity, GameError, GameRng, Result, MAX_IDENTITY_LEN};

pub use crate::rules::{
    plan_for, supported_sizes, GamePlan, Role, RoundRule, EVIL_TEAM, MERLIN_SEES, PERCIVAL_SEES,
};

pub use crate::game::{
    Game, GamePhase, Participant, FAIL_GLYPH, KING_GLYPH, LADY_GLYPH, SUCCESS_GLYPH,
};

pub use crate::store::{GameStore, MemoryStore, GAME_KEY_PREFIX, LOCK_KEY_PREFIX};

#[cfg(feature = "redis-store")]
pub use crate::store::{RedisLock, RedisStore, DEFAULT_LOCK_LEASE};
