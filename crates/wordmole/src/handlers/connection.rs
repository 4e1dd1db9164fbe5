//! Disconnect handling and timer-event processing.
//!
//! Disconnects mean different things by phase: a lobby member is simply
//! removed, while a mid-game player keeps their seat (and their votes,
//! clues, and eliminations) for the reconnection window. Timer events
//! always re-validate room state before acting; the timer may have
//! outlived the condition that armed it.

use tracing::{debug, info};

use wordmole_protocol::{Phase, PlayerId, RoomCode, ServerEvent};
use wordmole_room::{RoomRegistry, RoomTimer};

use crate::handlers::GameServer;
use crate::sink::EventSink;
use crate::words::WordService;

impl<S: EventSink, W: WordService> GameServer<S, W> {
    // -----------------------------------------------------------------------
    // Disconnect
    // -----------------------------------------------------------------------

    /// Handles a dropped connection. Unknown senders are ignored.
    pub fn handle_disconnect(&mut self, sender: &PlayerId) {
        let Some(code) = self.code_of(sender) else {
            return;
        };
        let Some(room) = self.rooms.room(&code) else {
            return;
        };

        if room.is_in_game() {
            // Keep the record so the session token can reclaim it.
            let Some(room) = self.rooms.room_mut(&code) else {
                return;
            };
            if let Some(player) = room.players.get_mut(sender) {
                player.is_connected = false;
            }
            let abandoned = !room.has_connected_players();

            debug!(code = %code, player = %sender, "mid-game disconnect");
            self.broadcast(
                &code,
                ServerEvent::PlayerDisconnected { id: sender.clone() },
            );
            if abandoned {
                self.rooms.schedule_room_deletion(&code);
            }
            return;
        }

        // Lobby: remove the seat outright, token included.
        let Some(removed) = self.rooms.remove_player(&code, sender) else {
            return;
        };
        self.rooms.remove_token(&removed.session_token);
        info!(code = %code, player = %sender, "player left lobby");

        let room = self.rooms.room(&code).expect("room present above");
        if room.players.is_empty() {
            self.rooms.schedule_room_deletion(&code);
            return;
        }
        if room.host_id == *sender {
            self.migrate_host(&code);
        }

        let room = self.rooms.room(&code).expect("room present above");
        let players = RoomRegistry::serialize_players(room);
        self.broadcast(&code, ServerEvent::RoomUpdated { players });
    }

    /// Hands host duties to another member after the host leaves,
    /// preferring connected alive players. Deterministic by id so every
    /// node would pick the same successor.
    fn migrate_host(&mut self, code: &RoomCode) {
        let Some(room) = self.rooms.room_mut(code) else {
            return;
        };
        let successor = room
            .players
            .values()
            .filter(|p| p.is_alive && p.is_connected)
            .map(|p| p.id.clone())
            .min_by(|a, b| a.0.cmp(&b.0))
            .or_else(|| {
                room.players
                    .keys()
                    .min_by(|a, b| a.0.cmp(&b.0))
                    .cloned()
            });
        if let Some(next) = successor {
            info!(code = %code, host = %next, "host migrated");
            room.host_id = next;
        }
    }

    // -----------------------------------------------------------------------
    // Timer events
    // -----------------------------------------------------------------------

    /// Processes a fired room timer on the event loop.
    pub fn handle_timer(&mut self, timer: RoomTimer) {
        match timer {
            RoomTimer::DeleteRoom(code) => {
                // Only delete if the room is still abandoned.
                let still_empty = self.rooms.room(&code).is_some_and(|r| {
                    r.players.is_empty() || !r.has_connected_players()
                });
                if still_empty {
                    self.rooms.delete_room(&code);
                } else {
                    debug!(code = %code, "deletion timer fired on occupied room");
                }
            }
            RoomTimer::RevealTimeout(code) => {
                let still_reveal = self
                    .rooms
                    .room(&code)
                    .is_some_and(|r| r.phase == Phase::Reveal);
                if still_reveal {
                    info!(code = %code, "reveal timeout, forcing first turn");
                    self.begin_first_turn(&code);
                }
            }
        }
    }
}
