//! In-memory store for tests and single-process use.
//!
//! Serializes through the same bincode snapshot path as the real backend,
//! so round-trip fidelity is exercised even in tests.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::error::Result;
use crate::game::state::Game;
use crate::store::{decode, encode, game_key, GameStore};

/// A `GameStore` backed by a process-local map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GameStore for MemoryStore {
    fn save(&mut self, game: &mut Game) -> Result<()> {
        game.mark_saved();
        let bytes = encode(game)?;
        debug!(game_id = game.game_id(), bytes = bytes.len(), "saving snapshot");
        self.entries.insert(game_key(game.game_id()), bytes);
        Ok(())
    }

    fn load(&mut self, game_id: &str) -> Result<Option<Game>> {
        match self.entries.get(&game_key(game_id)) {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn delete(&mut self, game_id: &str) -> Result<()> {
        self.entries.remove(&game_key(game_id));
        Ok(())
    }
}
