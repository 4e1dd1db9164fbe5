//! Action handlers, grouped by game stage.
//!
//! All handlers are methods on [`GameServer`] and run on the single
//! event loop; none of them blocks except `start_game`'s word lookup.
//! Room lookups go through the registry's indexes, mutations happen in
//! place, and outbound events leave through the injected sink.

mod clue;
mod connection;
mod lobby;
mod vote;

use rand::Rng;

use wordmole_protocol::{PlayerId, RoomCode, ServerEvent, SessionToken};
use wordmole_room::{Room, RoomRegistry};

use crate::sink::EventSink;
use crate::words::WordService;

/// The engine: one instance per process, owning every room.
///
/// Collaborators are injected: the sink carries events out, the word
/// service answers game-start lookups, and the registry (built around a
/// [`Scheduler`](wordmole_timer::Scheduler)) owns room-lifetime timers.
pub struct GameServer<S: EventSink, W: WordService> {
    rooms: RoomRegistry,
    sink: S,
    words: W,
}

impl<S: EventSink, W: WordService> GameServer<S, W> {
    pub fn new(rooms: RoomRegistry, sink: S, words: W) -> Self {
        Self { rooms, sink, words }
    }

    /// Read access for inspection and tests.
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    // -----------------------------------------------------------------------
    // Delivery helpers
    // -----------------------------------------------------------------------

    /// Sends `event` to every member of the room, connected or not; the
    /// transport drops events for dead connections.
    pub(crate) fn broadcast(&self, code: &RoomCode, event: ServerEvent) {
        let Some(room) = self.rooms.room(code) else {
            return;
        };
        for id in room.players.keys() {
            self.sink.send(id, event.clone());
        }
    }

    pub(crate) fn send_to(&self, recipient: &PlayerId, event: ServerEvent) {
        self.sink.send(recipient, event);
    }

    // -----------------------------------------------------------------------
    // Shared lookups
    // -----------------------------------------------------------------------

    /// The code of the room the sender belongs to, by the membership
    /// index.
    pub(crate) fn code_of(&self, sender: &PlayerId) -> Option<RoomCode> {
        self.rooms.room_code_of(sender).cloned()
    }
}

/// The `turn-started` announcement for the room's current turn, if the
/// turn order has a current player.
pub(crate) fn turn_event(room: &Room) -> Option<ServerEvent> {
    room.current_turn_player().map(|id| ServerEvent::TurnStarted {
        player_id: id.clone(),
        direction: room.turn_direction,
        round: room.current_round,
    })
}

/// Generates a fresh session token: 16 random bytes, hex-encoded.
pub(crate) fn generate_token() -> SessionToken {
    let bytes: [u8; 16] = rand::rng().random();
    let mut out = String::with_capacity(32);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    SessionToken(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_is_32_hex_chars() {
        let token = generate_token();
        assert_eq!(token.0.len(), 32);
        assert!(token.0.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_token_is_unique_across_calls() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a.0, b.0);
    }
}
