//! The room and player records: plain mutable state, one `Room` per
//! active game session.
//!
//! A `Room` is a value owned by the [`RoomRegistry`](crate::RoomRegistry);
//! handlers mutate its fields directly after validating the action, and
//! the pure [`engine`](crate::engine) functions compute role/turn/vote
//! results over it. Nothing here does I/O.

use std::collections::{HashMap, HashSet};

use wordmole_protocol::{
    GameConfig, Phase, PlayerId, Role, RoomCode, SessionToken, TurnDirection,
};
use wordmole_timer::TimerKey;

/// Hard cap on room membership.
pub const MAX_PLAYERS: usize = 10;

/// Minimum players required to start a game.
pub const MIN_PLAYERS: usize = 2;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One player record per connection that has joined a room.
///
/// The `id` is connection-scoped and NOT stable across reconnects; the
/// `session_token` is what survives a drop and lets the client reclaim
/// this record under a new connection id.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// `None` until roles are assigned at game start.
    pub role: Option<Role>,
    pub is_alive: bool,
    /// Cleared on a mid-game disconnect; the record stays for the
    /// reconnection window.
    pub is_connected: bool,
    pub session_token: SessionToken,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, token: SessionToken) -> Self {
        Self {
            id,
            name: name.into(),
            role: None,
            is_alive: true,
            is_connected: true,
            session_token: token,
        }
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// One active game session, keyed by its short code.
#[derive(Debug)]
pub struct Room {
    pub code: RoomCode,
    /// Always a current member of `players`.
    pub host_id: PlayerId,
    pub phase: Phase,
    pub players: HashMap<PlayerId, Player>,
    /// `None` until the host configures the game.
    pub config: Option<GameConfig>,
    /// The secret word, revealed to civilians at game start.
    pub word: Option<String>,
    /// The impostor-side reference word from the word service. Retained
    /// for compatibility with the lookup response; never sent to any
    /// client by this engine.
    pub reference_word: Option<String>,
    pub current_round: u32,
    /// Fixed at game start as a permutation of the player ids that
    /// existed at that moment; not re-shuffled mid-game.
    pub turn_order: Vec<PlayerId>,
    pub current_turn_index: usize,
    pub turn_direction: TurnDirection,
    /// Voter → clue text for the current round; cleared each new round.
    pub clues: HashMap<PlayerId, String>,
    /// Voter → target for the current round; cleared each new round.
    pub votes: HashMap<PlayerId, PlayerId>,
    /// Players removed from play by vote. Distinct from players who
    /// disconnected or left: an eliminated player stays in `players`
    /// with `is_alive = false`.
    pub eliminated: HashSet<PlayerId>,
    /// Readiness confirmations gating the first turn during `reveal`.
    pub ready_players: HashSet<PlayerId>,
    /// Handle to the armed reveal-readiness timer, if any.
    pub ready_timeout: Option<TimerKey>,
}

impl Room {
    /// Creates a fresh lobby with `host` as the sole member.
    pub fn new(code: RoomCode, host: Player) -> Self {
        let host_id = host.id.clone();
        let mut players = HashMap::new();
        players.insert(host_id.clone(), host);
        Self {
            code,
            host_id,
            phase: Phase::Lobby,
            players,
            config: None,
            word: None,
            reference_word: None,
            current_round: 1,
            turn_order: Vec::new(),
            current_turn_index: 0,
            turn_direction: TurnDirection::Right,
            clues: HashMap::new(),
            votes: HashMap::new(),
            eliminated: HashSet::new(),
            ready_players: HashSet::new(),
            ready_timeout: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    /// Any phase other than `lobby` counts as mid-game for join/leave
    /// purposes (including `game-over`, which rejects new joins).
    pub fn is_in_game(&self) -> bool {
        self.phase != Phase::Lobby
    }

    /// Whether `id` is a present, alive, non-eliminated member — the
    /// eligibility test for turns, clues, and votes.
    pub fn is_eligible(&self, id: &PlayerId) -> bool {
        self.players
            .get(id)
            .is_some_and(|p| p.is_alive && !self.eliminated.contains(id))
    }

    /// Ids of all eligible players. Iteration order is not guaranteed.
    pub fn alive_ids(&self) -> Vec<PlayerId> {
        self.players
            .keys()
            .filter(|id| self.is_eligible(id))
            .cloned()
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.players
            .keys()
            .filter(|id| self.is_eligible(id))
            .count()
    }

    pub fn alive_impostor_count(&self) -> usize {
        self.players
            .values()
            .filter(|p| {
                p.role == Some(Role::Impostor) && self.is_eligible(&p.id)
            })
            .count()
    }

    /// Whether any member still holds a live connection. A fully
    /// disconnected room is subject to the deletion grace period even
    /// mid-game.
    pub fn has_connected_players(&self) -> bool {
        self.players.values().any(|p| p.is_connected)
    }

    /// The player whose turn it currently is, if the turn order is set.
    pub fn current_turn_player(&self) -> Option<&PlayerId> {
        self.turn_order.get(self.current_turn_index)
    }

    /// Index of the first eligible player in `turn_order`, used to reset
    /// the turn pointer at the start of a new round. Falls back to 0 in
    /// the degenerate everyone-eliminated case.
    pub fn first_alive_turn_index(&self) -> usize {
        self.turn_order
            .iter()
            .position(|id| self.is_eligible(id))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> PlayerId {
        PlayerId::from(s)
    }

    fn token(s: &str) -> SessionToken {
        SessionToken(s.to_string())
    }

    fn room_with(ids: &[&str]) -> Room {
        let host = Player::new(pid(ids[0]), ids[0], token("t0"));
        let mut room = Room::new(RoomCode::from("TEST1"), host);
        for id in &ids[1..] {
            room.players
                .insert(pid(id), Player::new(pid(id), *id, token(id)));
        }
        room
    }

    #[test]
    fn test_new_room_starts_in_lobby_with_host_only() {
        let room = room_with(&["h"]);
        assert_eq!(room.phase, Phase::Lobby);
        assert_eq!(room.players.len(), 1);
        assert_eq!(room.host_id, pid("h"));
        assert!(room.config.is_none());
        assert!(!room.is_in_game());
    }

    #[test]
    fn test_is_eligible_excludes_eliminated_and_dead() {
        let mut room = room_with(&["a", "b", "c"]);
        room.eliminated.insert(pid("b"));
        room.players.get_mut(&pid("c")).unwrap().is_alive = false;

        assert!(room.is_eligible(&pid("a")));
        assert!(!room.is_eligible(&pid("b")));
        assert!(!room.is_eligible(&pid("c")));
        assert!(!room.is_eligible(&pid("ghost")));
        assert_eq!(room.alive_count(), 1);
    }

    #[test]
    fn test_first_alive_turn_index_skips_eliminated() {
        let mut room = room_with(&["a", "b", "c"]);
        room.turn_order = vec![pid("a"), pid("b"), pid("c")];
        room.eliminated.insert(pid("a"));
        room.players.get_mut(&pid("a")).unwrap().is_alive = false;
        assert_eq!(room.first_alive_turn_index(), 1);
    }

    #[test]
    fn test_first_alive_turn_index_defaults_to_zero_when_all_gone() {
        let mut room = room_with(&["a"]);
        room.turn_order = vec![pid("a")];
        room.players.get_mut(&pid("a")).unwrap().is_alive = false;
        assert_eq!(room.first_alive_turn_index(), 0);
    }

    #[test]
    fn test_is_full_at_max_players() {
        let ids: Vec<String> = (0..MAX_PLAYERS).map(|i| format!("p{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let room = room_with(&refs);
        assert!(room.is_full());
    }
}
