//! Room state, the pure game engine, and the room registry.
//!
//! Layering: [`room`] holds the plain data model, [`engine`] computes
//! role/turn/vote results over it without I/O, and [`store`] owns every
//! live room plus the reconnection and membership indexes. The crate
//! does no networking; it is driven by whatever event loop sits above.

pub mod engine;
pub mod error;
pub mod room;
pub mod store;

pub use engine::{assign_roles, check_victory, next_turn_index, resolve_votes, VoteOutcome};
pub use error::RoomError;
pub use room::{Player, Room, MAX_PLAYERS, MIN_PLAYERS};
pub use store::{RoomRegistry, RoomTimer, EMPTY_ROOM_GRACE, REVEAL_TIMEOUT};
