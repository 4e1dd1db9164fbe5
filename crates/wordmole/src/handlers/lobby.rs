//! Lobby-stage handlers: room creation, joins and reconnections,
//! configuration, and game start.

use tracing::{debug, info, warn};

use wordmole_protocol::{
    ClueEntry, GameConfig, Phase, PlayerId, Role, RoomAck, RoomCode,
    ServerEvent, SessionToken,
};
use wordmole_room::{assign_roles, Player, RoomRegistry, MIN_PLAYERS};

use crate::error::ActionError;
use crate::handlers::{generate_token, turn_event, GameServer};
use crate::sink::EventSink;
use crate::words::WordService;

impl<S: EventSink, W: WordService> GameServer<S, W> {
    // -----------------------------------------------------------------------
    // create-room
    // -----------------------------------------------------------------------

    /// Creates a room with the sender as host and returns the ack the
    /// caller's callback delivers: code, roster, and session token.
    pub fn create_room(&mut self, sender: &PlayerId, name: String) -> RoomAck {
        let token = generate_token();
        let host = Player::new(sender.clone(), name, token.clone());
        let room = self.rooms.create_room(host);
        RoomAck {
            code: room.code.clone(),
            players: RoomRegistry::serialize_players(room),
            token,
        }
    }

    // -----------------------------------------------------------------------
    // join-room
    // -----------------------------------------------------------------------

    /// Joins a room, or reclaims an existing seat when the supplied
    /// session token resolves to a player of this room. Fresh joins are
    /// rejected once the game has started; reconnections are not.
    pub fn join_room(
        &mut self,
        sender: &PlayerId,
        code: RoomCode,
        name: String,
        session_token: Option<SessionToken>,
    ) -> Result<RoomAck, ActionError> {
        if let Some(token) = session_token {
            let reclaimed = self
                .rooms
                .lookup_token(&token)
                .filter(|(tok_code, _)| **tok_code == code)
                .map(|(_, old)| old.clone());
            if let Some(old) = reclaimed {
                return self.reconnect(sender, &code, old, token);
            }
            // Unknown or mismatched token: fall through to a fresh join.
            debug!(code = %code, "stale session token, joining fresh");
        }

        let room = self.rooms.room(&code).ok_or(ActionError::RoomNotFound)?;
        if room.is_in_game() {
            return Err(ActionError::GameInProgress);
        }
        if room.is_full() {
            return Err(ActionError::RoomFull);
        }

        let token = generate_token();
        let player = Player::new(sender.clone(), name, token.clone());
        if !self.rooms.add_player(&code, player) {
            return Err(ActionError::RoomFull);
        }

        let room = self.rooms.room_mut(&code).expect("presence checked above");
        // A join during the empty-room grace period lands in a hostless
        // room; the newcomer takes over.
        if !room.players.contains_key(&room.host_id) {
            room.host_id = sender.clone();
        }
        let players = RoomRegistry::serialize_players(room);
        info!(code = %code, player = %sender, "player joined");
        self.broadcast(
            &code,
            ServerEvent::RoomUpdated {
                players: players.clone(),
            },
        );
        Ok(RoomAck {
            code,
            players,
            token,
        })
    }

    /// Rebinds a token-holder's seat to the sender's connection and
    /// replays the state a mid-game client needs to resume: its role,
    /// the clue history, and the current turn or open vote.
    fn reconnect(
        &mut self,
        sender: &PlayerId,
        code: &RoomCode,
        old: PlayerId,
        token: SessionToken,
    ) -> Result<RoomAck, ActionError> {
        self.rooms.cancel_scheduled_deletion(code);

        if old == *sender {
            // Same connection re-sent the join; just refresh liveness.
            let room = self.rooms.room_mut(code).ok_or(ActionError::RoomNotFound)?;
            let player = room.players.get_mut(sender).ok_or(ActionError::RoomNotFound)?;
            player.is_connected = true;
        } else {
            self.rooms
                .replace_player_socket(code, &old, sender.clone())
                .ok_or(ActionError::RoomNotFound)?;
            info!(code = %code, player = %sender, "player reconnected");
        }

        let room = self.rooms.room(code).ok_or(ActionError::RoomNotFound)?;
        let players = RoomRegistry::serialize_players(room);

        let mut replay = Vec::new();
        if room.is_in_game() {
            if let Some(role) = room.players.get(sender).and_then(|p| p.role) {
                let word = match role {
                    Role::Civil => room.word.clone(),
                    Role::Impostor => None,
                };
                replay.push(ServerEvent::RoleAssigned { role, word });
            }
            if matches!(room.phase, Phase::CluePhase | Phase::Voting) {
                let clues = room
                    .clues
                    .iter()
                    .map(|(id, clue)| ClueEntry {
                        player_id: id.clone(),
                        player_name: room
                            .players
                            .get(id)
                            .map(|p| p.name.clone())
                            .unwrap_or_default(),
                        clue: clue.clone(),
                    })
                    .collect();
                replay.push(ServerEvent::CluesHistory { clues });
            }
            if room.phase == Phase::CluePhase {
                replay.extend(turn_event(room));
            }
            if room.phase == Phase::Voting {
                replay.push(ServerEvent::VotingStarted);
            }
        }

        self.broadcast(
            code,
            ServerEvent::RoomUpdated {
                players: players.clone(),
            },
        );
        for event in replay {
            self.send_to(sender, event);
        }
        Ok(RoomAck {
            code: code.clone(),
            players,
            token,
        })
    }

    // -----------------------------------------------------------------------
    // update-config
    // -----------------------------------------------------------------------

    /// Host-only, lobby-only. Echoes the accepted config to the room.
    pub fn update_config(
        &mut self,
        sender: &PlayerId,
        config: GameConfig,
    ) -> Result<(), ActionError> {
        let code = self.code_of(sender).ok_or(ActionError::RoomNotFound)?;
        let room = self.rooms.room_mut(&code).ok_or(ActionError::RoomNotFound)?;
        if room.host_id != *sender {
            return Err(ActionError::NotHost);
        }
        if room.is_in_game() {
            return Err(ActionError::WrongPhase);
        }

        room.config = Some(config.clone());
        debug!(code = %code, category = %config.category_id, "config updated");
        self.broadcast(&code, ServerEvent::ConfigUpdated { config });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // start-game
    // -----------------------------------------------------------------------

    /// Host-only. Fetches the word pair, assigns roles, and moves the
    /// room into the reveal phase. The word lookup is the only await in
    /// the engine, so the room is re-validated after it resolves.
    pub async fn start_game(&mut self, sender: &PlayerId) -> Result<(), ActionError> {
        let code = self.code_of(sender).ok_or(ActionError::RoomNotFound)?;
        let category = {
            let room = self.rooms.room(&code).ok_or(ActionError::RoomNotFound)?;
            if room.host_id != *sender {
                return Err(ActionError::NotHost);
            }
            if room.is_in_game() {
                return Err(ActionError::GameInProgress);
            }
            if room.players.len() < MIN_PLAYERS {
                return Err(ActionError::NotEnoughPlayers);
            }
            room.config
                .as_ref()
                .ok_or(ActionError::MissingConfig)?
                .category_id
                .clone()
        };

        let pair = match self.words.fetch_pair(&category).await {
            Ok(pair) => pair,
            Err(err) => {
                warn!(code = %code, error = %err, "word lookup failed");
                return Err(err.into());
            }
        };

        // The room may have changed, or vanished, during the lookup.
        let room = self.rooms.room_mut(&code).ok_or(ActionError::StartAborted)?;
        if room.is_in_game() {
            return Err(ActionError::GameInProgress);
        }
        if room.players.len() < MIN_PLAYERS {
            return Err(ActionError::NotEnoughPlayers);
        }

        room.eliminated.clear();
        room.ready_players.clear();
        room.clues.clear();
        room.votes.clear();
        room.current_round = 1;
        assign_roles(room, &mut rand::rng())?;
        room.word = Some(pair.word);
        room.reference_word = Some(pair.reference);
        room.phase = Phase::Reveal;

        let assignments: Vec<(PlayerId, Role, Option<String>)> = room
            .players
            .values()
            .map(|p| {
                let role = p.role.expect("roles assigned above");
                let word = match role {
                    Role::Civil => room.word.clone(),
                    Role::Impostor => None,
                };
                (p.id.clone(), role, word)
            })
            .collect();

        info!(code = %code, players = assignments.len(), "game started");
        self.broadcast(&code, ServerEvent::GameStarted);
        for (id, role, word) in assignments {
            self.send_to(&id, ServerEvent::RoleAssigned { role, word });
        }
        self.rooms.arm_reveal_timeout(&code);
        Ok(())
    }
}
