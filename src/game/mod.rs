//! The game aggregate: participants and the phase state machine.

pub mod participant;
pub mod state;

pub use participant::Participant;
pub use state::{Game, GamePhase, FAIL_GLYPH, KING_GLYPH, LADY_GLYPH, SUCCESS_GLYPH};
