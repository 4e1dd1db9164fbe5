//! Wire protocol for wordmole.
//!
//! This crate defines the "language" spoken between the engine and the
//! external pub/sub socket layer:
//!
//! - **Types** ([`PlayerId`], [`RoomCode`], [`Phase`], [`GameConfig`], …)
//! - **Actions and broadcasts** ([`ClientAction`], [`ServerEvent`])
//! - **Codec** ([`Codec`] trait, [`JsonCodec`])
//! - **Errors** ([`ProtocolError`])
//!
//! The protocol layer knows nothing about rooms or timers — it only
//! defines message shapes and how they serialize.

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientAction, ErrorCode, RoomAck, RoundResult, ServerEvent};
pub use types::{
    ClueEntry, GameConfig, Phase, PlayerId, PlayerSummary, Role, RoleReveal,
    RoomCode, SessionToken, TurnDirection, Winner,
};
