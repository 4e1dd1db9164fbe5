use thiserror::Error;

use wordmole_protocol::ErrorCode;
use wordmole_room::RoomError;

use crate::words::WordServiceError;

/// A rejected client action. Each variant maps to the wire-level
/// [`ErrorCode`] the caller's callback receives.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("room not found")]
    RoomNotFound,
    #[error("room is full")]
    RoomFull,
    #[error("game already in progress")]
    GameInProgress,
    #[error("only the host can do that")]
    NotHost,
    #[error("game has not been configured")]
    MissingConfig,
    #[error("not enough players to start")]
    NotEnoughPlayers,
    #[error("action not valid in the current phase")]
    WrongPhase,
    /// The room vanished while the word lookup was in flight. The
    /// client may simply retry.
    #[error("room closed while the game was starting")]
    StartAborted,
    #[error("could not start the game: {0}")]
    WordService(#[from] WordServiceError),
}

impl ActionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::RoomNotFound => ErrorCode::RoomNotFound,
            Self::RoomFull => ErrorCode::RoomFull,
            Self::GameInProgress => ErrorCode::GameInProgress,
            Self::NotHost => ErrorCode::NotHost,
            Self::MissingConfig => ErrorCode::MissingConfig,
            Self::NotEnoughPlayers => ErrorCode::NotEnoughPlayers,
            Self::WrongPhase => ErrorCode::WrongPhase,
            Self::StartAborted | Self::WordService(_) => ErrorCode::StartError,
        }
    }
}

/// Unified error for embedders that drive the codec and the engine
/// through one result type.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Protocol(#[from] wordmole_protocol::ProtocolError),
    #[error(transparent)]
    Room(#[from] RoomError),
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl From<RoomError> for ActionError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::MissingConfig => Self::MissingConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_service_failure_maps_to_start_error() {
        let err = ActionError::from(WordServiceError::Unavailable("down".into()));
        assert_eq!(err.code(), ErrorCode::StartError);
    }

    #[test]
    fn test_room_error_maps_to_missing_config() {
        let err = ActionError::from(RoomError::MissingConfig);
        assert_eq!(err.code(), ErrorCode::MissingConfig);
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let err = EngineError::from(ActionError::RoomNotFound);
        assert_eq!(err.to_string(), "room not found");
    }
}
