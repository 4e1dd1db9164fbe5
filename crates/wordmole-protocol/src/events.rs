//! Inbound actions and outbound broadcasts.
//!
//! [`ClientAction`] is what the socket layer delivers to the engine;
//! [`ServerEvent`] is what the engine hands back for delivery. Both use
//! adjacently tagged JSON (`{ "type": "...", "data": { ... } }`) with
//! kebab-case event names matching the client SDK.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{
    ClueEntry, GameConfig, PlayerId, PlayerSummary, Role, RoleReveal,
    SessionToken, TurnDirection, Winner,
};

// ---------------------------------------------------------------------------
// Inbound: client → engine
// ---------------------------------------------------------------------------

/// An action sent by a client, scoped to the sender's connection id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ClientAction {
    CreateRoom {
        name: String,
    },
    JoinRoom {
        code: crate::types::RoomCode,
        name: String,
        /// Present on a reconnection attempt; absent on a fresh join.
        #[serde(
            rename = "sessionToken",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        session_token: Option<SessionToken>,
    },
    /// Host-only.
    UpdateConfig {
        config: GameConfig,
    },
    /// Host-only.
    StartGame,
    PlayerReady,
    SubmitClue {
        text: String,
    },
    SubmitVote {
        #[serde(rename = "targetId")]
        target_id: PlayerId,
    },
}

// ---------------------------------------------------------------------------
// Outbound: engine → clients
// ---------------------------------------------------------------------------

/// An event emitted by the engine. Most are room broadcasts;
/// `role-assigned` is strictly per-player (it carries the secret word).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    RoomUpdated {
        players: Vec<PlayerSummary>,
    },
    ConfigUpdated {
        config: GameConfig,
    },
    GameStarted,
    /// Per-player only. Civilians receive the word; impostors get `None`
    /// and must work from the category alone.
    RoleAssigned {
        role: Role,
        word: Option<String>,
    },
    TurnStarted {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        direction: TurnDirection,
        round: u32,
    },
    ClueSubmitted {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        #[serde(rename = "playerName")]
        player_name: String,
        clue: String,
    },
    VotingStarted,
    /// Replayed to a reconnecting client mid clue-phase.
    CluesHistory {
        clues: Vec<ClueEntry>,
    },
    /// Announces that a vote was cast, not its content.
    VoteCast {
        #[serde(rename = "voterId")]
        voter_id: PlayerId,
    },
    RoundResult(RoundResult),
    GameOver {
        winner: Winner,
        roles: Vec<RoleReveal>,
        word: Option<String>,
    },
    PlayerDisconnected {
        id: PlayerId,
    },
}

/// The outcome of a voting round, broadcast on round-end.
///
/// All `eliminated_*` fields are `None` when the vote tied or nobody
/// voted (no elimination).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub eliminated_id: Option<PlayerId>,
    pub eliminated_name: Option<String>,
    pub eliminated_role: Option<Role>,
    /// Voter → target, disclosed once the round resolves.
    pub votes: HashMap<PlayerId, PlayerId>,
    /// Set only on the civilian short-circuit win (last impostor voted out).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    pub round: u32,
    pub players: Vec<PlayerSummary>,
}

// ---------------------------------------------------------------------------
// Acknowledgements and error codes
// ---------------------------------------------------------------------------

/// Reply to `create-room` / `join-room`, delivered only to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAck {
    pub code: crate::types::RoomCode,
    pub players: Vec<PlayerSummary>,
    pub token: SessionToken,
}

/// Wire-level error codes returned through action callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    RoomNotFound,
    RoomFull,
    GameInProgress,
    NotHost,
    MissingConfig,
    NotEnoughPlayers,
    WrongPhase,
    StartError,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoomCode;

    #[test]
    fn test_client_action_join_room_json_shape() {
        let action = ClientAction::JoinRoom {
            code: RoomCode::from("QWX42"),
            name: "Bea".into(),
            session_token: None,
        };
        let json: serde_json::Value = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "join-room");
        assert_eq!(json["data"]["code"], "QWX42");
        assert!(json["data"].get("sessionToken").is_none());
    }

    #[test]
    fn test_client_action_start_game_round_trip() {
        let action = ClientAction::StartGame;
        let bytes = serde_json::to_vec(&action).unwrap();
        let decoded: ClientAction = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(action, decoded);
    }

    #[test]
    fn test_server_event_names_are_kebab_case() {
        let event = ServerEvent::VotingStarted;
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "voting-started");

        let event = ServerEvent::PlayerDisconnected {
            id: PlayerId::from("s9"),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "player-disconnected");
    }

    #[test]
    fn test_turn_started_payload_fields() {
        let event = ServerEvent::TurnStarted {
            player_id: PlayerId::from("s1"),
            direction: TurnDirection::Right,
            round: 2,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "turn-started");
        assert_eq!(json["data"]["playerId"], "s1");
        assert_eq!(json["data"]["direction"], "right");
        assert_eq!(json["data"]["round"], 2);
    }

    #[test]
    fn test_role_assigned_impostor_has_null_word() {
        let event = ServerEvent::RoleAssigned {
            role: Role::Impostor,
            word: None,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["data"]["role"], "impostor");
        assert!(json["data"]["word"].is_null());
    }

    #[test]
    fn test_round_result_omits_winner_when_none() {
        let result = RoundResult {
            eliminated_id: None,
            eliminated_name: None,
            eliminated_role: None,
            votes: HashMap::new(),
            winner: None,
            round: 1,
            players: vec![],
        };
        let json: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert!(json.get("winner").is_none());
        assert!(json["eliminatedId"].is_null());
    }

    #[test]
    fn test_round_result_votes_serialize_as_object() {
        let mut votes = HashMap::new();
        votes.insert(PlayerId::from("p1"), PlayerId::from("p3"));
        let result = RoundResult {
            eliminated_id: Some(PlayerId::from("p3")),
            eliminated_name: Some("Cleo".into()),
            eliminated_role: Some(Role::Impostor),
            votes,
            winner: Some(Winner::Civiles),
            round: 1,
            players: vec![],
        };
        let json: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["votes"]["p1"], "p3");
        assert_eq!(json["winner"], "civiles");
        assert_eq!(json["eliminatedRole"], "impostor");
    }

    #[test]
    fn test_error_code_screaming_snake_literals() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::StartError).unwrap(),
            "\"START_ERROR\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorCode::RoomNotFound).unwrap(),
            "\"ROOM_NOT_FOUND\""
        );
    }

    #[test]
    fn test_decode_unknown_action_type_returns_error() {
        let unknown = r#"{"type": "fly-to-moon", "data": {}}"#;
        let result: Result<ClientAction, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}
