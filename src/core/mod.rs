//! Core primitives: identity validation, RNG, error taxonomy.

pub mod error;
pub mod identity;
pub mod rng;

pub use error::{GameError, Result};
pub use identity::{verify_identity, MAX_IDENTITY_LEN};
pub use rng::GameRng;
