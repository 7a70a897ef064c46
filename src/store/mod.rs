//! Persistence and locking adapters.
//!
//! The engine itself performs no I/O. Callers are expected to run every
//! mutation as a transaction: acquire the per-game lock, load the snapshot,
//! invoke exactly one operation on [`Game`](crate::game::Game), save, and
//! release the lock on every exit path. Stores keep the whole aggregate as
//! one opaque bincode value under a namespaced key, so two different game
//! identifiers never contend.

use crate::core::error::Result;
use crate::game::state::Game;

pub mod memory;
#[cfg(feature = "redis-store")]
pub mod redis;

pub use memory::MemoryStore;
#[cfg(feature = "redis-store")]
pub use self::redis::{RedisLock, RedisStore, DEFAULT_LOCK_LEASE};

/// Key prefix for game snapshots.
pub const GAME_KEY_PREFIX: &str = "avalon:game:";
/// Key prefix for per-game locks.
pub const LOCK_KEY_PREFIX: &str = "avalon:lock:";

/// Snapshot persistence for game aggregates.
///
/// `save` stamps the game's last-save timestamp before writing. Snapshots
/// round-trip every field of the aggregate, including dealt roles and the
/// tri-state vote and quest-action fields.
pub trait GameStore {
    fn save(&mut self, game: &mut Game) -> Result<()>;
    fn load(&mut self, game_id: &str) -> Result<Option<Game>>;
    fn delete(&mut self, game_id: &str) -> Result<()>;
}

pub(crate) fn game_key(game_id: &str) -> String {
    format!("{GAME_KEY_PREFIX}{game_id}")
}

#[cfg(feature = "redis-store")]
pub(crate) fn lock_key(game_id: &str) -> String {
    format!("{LOCK_KEY_PREFIX}{game_id}")
}

pub(crate) fn encode(game: &Game) -> Result<Vec<u8>> {
    Ok(bincode::serialize(game)?)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Game> {
    Ok(bincode::deserialize(bytes)?)
}
