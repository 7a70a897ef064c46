//! Redis-backed snapshots and per-game locks.
//!
//! Snapshots live under [`GAME_KEY_PREFIX`](crate::store::GAME_KEY_PREFIX)
//! and locks under [`LOCK_KEY_PREFIX`](crate::store::LOCK_KEY_PREFIX), in
//! the same keyspace. A lock is `SET key token NX PX lease`: the lease
//! bounds how long a crashed holder can block a game, and the token stops
//! a holder whose lease expired from deleting someone else's lock.

use std::thread;
use std::time::{Duration, Instant};

use redis::Commands;
use tracing::{debug, warn};

use crate::core::error::{GameError, Result};
use crate::core::rng::GameRng;
use crate::game::state::Game;
use crate::store::{decode, encode, game_key, lock_key, GameStore};

/// Default lock lease; long enough for any load-mutate-save transaction.
pub const DEFAULT_LOCK_LEASE: Duration = Duration::from_secs(120);

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const ACQUIRE_RETRY: Duration = Duration::from_millis(50);

/// A `GameStore` backed by a Redis connection.
pub struct RedisStore {
    client: redis::Client,
    conn: redis::Connection,
}

impl RedisStore {
    /// Connect to Redis at `url` (e.g. `redis://127.0.0.1/`).
    pub fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection()?;
        Ok(Self { client, conn })
    }

    /// Acquire the exclusive per-game lock, waiting up to a bounded
    /// acquisition window.
    ///
    /// The returned guard releases the lock when dropped, so it covers
    /// every exit path of the caller's load-mutate-save transaction.
    pub fn acquire_lock(&self, game_id: &str, lease: Duration) -> Result<RedisLock> {
        let mut conn = self.client.get_connection()?;
        let key = lock_key(game_id);
        let token = GameRng::from_entropy().gen_token();
        let deadline = Instant::now() + ACQUIRE_TIMEOUT;

        loop {
            let acquired: Option<String> = redis::cmd("SET")
                .arg(&key)
                .arg(token)
                .arg("NX")
                .arg("PX")
                .arg(lease.as_millis() as u64)
                .query(&mut conn)?;
            if acquired.is_some() {
                debug!(game_id, "game lock acquired");
                return Ok(RedisLock {
                    conn,
                    key,
                    token,
                    released: false,
                });
            }
            if Instant::now() >= deadline {
                return Err(GameError::LockTimeout(game_id.to_owned()));
            }
            thread::sleep(ACQUIRE_RETRY);
        }
    }
}

impl GameStore for RedisStore {
    fn save(&mut self, game: &mut Game) -> Result<()> {
        game.mark_saved();
        let bytes = encode(game)?;
        debug!(game_id = game.game_id(), bytes = bytes.len(), "saving snapshot");
        let _: () = self.conn.set(game_key(game.game_id()), bytes)?;
        Ok(())
    }

    fn load(&mut self, game_id: &str) -> Result<Option<Game>> {
        let bytes: Option<Vec<u8>> = self.conn.get(game_key(game_id))?;
        match bytes {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn delete(&mut self, game_id: &str) -> Result<()> {
        let _: () = self.conn.del(game_key(game_id))?;
        Ok(())
    }
}

/// Held per-game lock; released on drop.
pub struct RedisLock {
    conn: redis::Connection,
    key: String,
    token: u64,
    released: bool,
}

impl RedisLock {
    /// Release explicitly to observe release errors.
    pub fn release(mut self) -> Result<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        // Delete only if we still hold the lease.
        let holder: Option<u64> = self.conn.get(&self.key)?;
        if holder == Some(self.token) {
            let _: () = self.conn.del(&self.key)?;
            debug!(key = %self.key, "game lock released");
        }
        Ok(())
    }
}

impl Drop for RedisLock {
    fn drop(&mut self) {
        if let Err(err) = self.release_inner() {
            warn!(key = %self.key, %err, "failed to release game lock");
        }
    }
}
