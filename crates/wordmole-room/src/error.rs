use thiserror::Error;

/// Errors from room-level operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    /// Game start was attempted before the host configured the game.
    #[error("room has no game configuration")]
    MissingConfig,
}
