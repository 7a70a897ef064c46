//! Identity validation for game and participant identifiers.
//!
//! Identities are opaque caller-supplied strings used as storage keys and
//! roster lookups, so they are restricted to word characters and hyphens
//! with a bounded length. Validation happens at construction time, before
//! any state mutation.

use crate::core::error::GameError;

/// Maximum identity length in characters.
pub const MAX_IDENTITY_LEN: usize = 64;

/// Check that `identity` is a run of at most 64 word characters or hyphens.
///
/// The empty string is accepted.
pub fn verify_identity(identity: &str) -> Result<(), GameError> {
    let mut len = 0;
    for c in identity.chars() {
        len += 1;
        if len > MAX_IDENTITY_LEN || !is_identity_char(c) {
            return Err(GameError::InvalidIdentity(identity.to_owned()));
        }
    }
    Ok(())
}

fn is_identity_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
