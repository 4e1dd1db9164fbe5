//! Core identity and game-state types shared across the engine.
//!
//! Everything here crosses the wire to the socket layer, so the serde
//! representations are fixed: phases and directions are kebab-case
//! strings, roles and winners are the client literals (`"civil"`,
//! `"impostor"`, `"civiles"`, `"impostores"`), and struct fields are
//! camelCase.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A connection-scoped player identifier, issued by the socket layer.
///
/// Not stable across reconnects: a player who drops and rejoins gets a
/// fresh `PlayerId`, and the engine rewrites the old id everywhere it
/// appears (see `RoomRegistry::replace_player_socket`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A short human-typeable room identifier (uppercase alphanumeric).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(pub String);

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An opaque secret that lets a client reclaim its `Player` record after
/// a connection drop. Never broadcast; sent only to its owner.
///
/// No `Display` impl so it cannot leak into logs by accident.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub String);

// ---------------------------------------------------------------------------
// Game enums
// ---------------------------------------------------------------------------

/// A player's secret role. Civilians know the word; impostors only know
/// the category and must bluff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Civil,
    Impostor,
}

/// The room's stage in the game state machine.
///
/// ```text
/// lobby → reveal → clue-phase → voting → round-end → (clue-phase | game-over)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Lobby,
    Reveal,
    CluePhase,
    Voting,
    RoundEnd,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lobby => "lobby",
            Self::Reveal => "reveal",
            Self::CluePhase => "clue-phase",
            Self::Voting => "voting",
            Self::RoundEnd => "round-end",
            Self::GameOver => "game-over",
        };
        write!(f, "{s}")
    }
}

/// Which way the turn pointer steps through `turn_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnDirection {
    /// Decrement the turn index (wrapping).
    Left,
    /// Increment the turn index (wrapping).
    Right,
}

/// The winning side of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Civiles,
    Impostores,
}

// ---------------------------------------------------------------------------
// Config and projections
// ---------------------------------------------------------------------------

/// Host-chosen game settings. Absent on the room until the host
/// configures it; `start-game` requires it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Requested impostor count. Clamped to `player_count - 1` at role
    /// assignment so at least one civilian always exists.
    pub impostor_count: usize,
    /// Number of clue/vote rounds before the impostors win by survival.
    pub rounds: u32,
    pub category_id: String,
    pub category_name: String,
}

/// The externally-visible projection of a player. Never exposes the
/// role or the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    pub is_alive: bool,
    pub is_eliminated: bool,
}

/// One entry of the clue history replayed to reconnecting clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub clue: String,
}

/// A player's role disclosed to everyone at game over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleReveal {
    pub player_id: PlayerId,
    pub name: String,
    pub role: Role,
}

// =========================================================================
// Tests
// =========================================================================
