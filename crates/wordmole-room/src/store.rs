//! The room registry: every live room, plus the indexes that let a
//! single inbound message find its room quickly.
//!
//! Three maps are kept in lockstep:
//!
//! - `rooms`: code → `Room`, the authoritative state.
//! - `tokens`: session token → (code, player id), for reconnection.
//! - `player_rooms`: player id → code, so disconnect handling never
//!   scans every room.
//!
//! The registry also owns the [`Scheduler`] that arms room-lifetime
//! timers; fired [`RoomTimer`] events come back to the caller through
//! whatever channel the scheduler was built with.

use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use wordmole_protocol::{PlayerId, PlayerSummary, RoomCode, SessionToken};
use wordmole_timer::{Scheduler, TimerKey};

use crate::{Player, Room};

/// Grace period before an empty room is deleted. A timely reconnection
/// or rejoin cancels it.
pub const EMPTY_ROOM_GRACE: Duration = Duration::from_secs(15);

/// How long the reveal phase waits for readiness confirmations before
/// forcing the first turn.
pub const REVEAL_TIMEOUT: Duration = Duration::from_secs(15);

const CODE_LEN: usize = 5;
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Timer events the registry arms. Delivered back into the event loop,
/// which must re-validate state before acting: the world may have
/// changed while the timer slept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomTimer {
    /// The empty-room grace period elapsed.
    DeleteRoom(RoomCode),
    /// The reveal-phase readiness window elapsed.
    RevealTimeout(RoomCode),
}

// ---------------------------------------------------------------------------
// RoomRegistry
// ---------------------------------------------------------------------------

pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    tokens: HashMap<SessionToken, (RoomCode, PlayerId)>,
    player_rooms: HashMap<PlayerId, RoomCode>,
    /// Armed empty-room deletion timers, one at most per room.
    pending_deletions: HashMap<RoomCode, TimerKey>,
    scheduler: Box<dyn Scheduler<RoomTimer>>,
}

impl RoomRegistry {
    pub fn new(scheduler: Box<dyn Scheduler<RoomTimer>>) -> Self {
        Self {
            rooms: HashMap::new(),
            tokens: HashMap::new(),
            player_rooms: HashMap::new(),
            pending_deletions: HashMap::new(),
            scheduler,
        }
    }

    // -----------------------------------------------------------------------
    // Creation and lookup
    // -----------------------------------------------------------------------

    /// Creates a room under a freshly generated code with `host` as the
    /// sole member, indexing the host's token and room membership.
    pub fn create_room(&mut self, host: Player) -> &Room {
        let code = self.generate_code();
        self.tokens
            .insert(host.session_token.clone(), (code.clone(), host.id.clone()));
        self.player_rooms.insert(host.id.clone(), code.clone());

        let room = Room::new(code.clone(), host);
        info!(code = %code, host = %room.host_id, "room created");
        self.rooms.insert(code.clone(), room);
        self.rooms.get(&code).expect("just inserted")
    }

    fn generate_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        loop {
            let code: String = (0..CODE_LEN)
                .map(|_| {
                    let i = rng.random_range(0..CODE_CHARSET.len());
                    CODE_CHARSET[i] as char
                })
                .collect();
            let code = RoomCode(code);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    pub fn room(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn room_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// The room a player currently belongs to, via the membership index.
    pub fn room_code_of(&self, player: &PlayerId) -> Option<&RoomCode> {
        self.player_rooms.get(player)
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Adds a player to a room, cancelling any pending deletion of it.
    /// Returns `false` if the room does not exist or is full.
    pub fn add_player(&mut self, code: &RoomCode, player: Player) -> bool {
        match self.rooms.get(code) {
            Some(room) if !room.is_full() => {}
            _ => return false,
        }
        self.cancel_scheduled_deletion(code);

        self.tokens
            .insert(player.session_token.clone(), (code.clone(), player.id.clone()));
        self.player_rooms.insert(player.id.clone(), code.clone());
        let room = self.rooms.get_mut(code).expect("presence checked above");
        room.players.insert(player.id.clone(), player);
        true
    }

    /// Removes a player record from a room and the membership index.
    /// Turn order, votes, and the eliminated set are left to the caller,
    /// which knows the phase.
    pub fn remove_player(
        &mut self,
        code: &RoomCode,
        player: &PlayerId,
    ) -> Option<Player> {
        let room = self.rooms.get_mut(code)?;
        let removed = room.players.remove(player);
        if removed.is_some() {
            self.player_rooms.remove(player);
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Reconnection
    // -----------------------------------------------------------------------

    /// Rebinds an existing player record to a new connection id after a
    /// reconnect. Every id-keyed structure in the room is rewritten so
    /// game state follows the player: players map, host id, turn order,
    /// clues, votes (as voter and as target), eliminations, readiness.
    ///
    /// Returns the rebound player, or `None` if the room or old id is
    /// unknown.
    pub fn replace_player_socket(
        &mut self,
        code: &RoomCode,
        old: &PlayerId,
        new: PlayerId,
    ) -> Option<&Player> {
        {
            let room = self.rooms.get_mut(code)?;
            let mut player = room.players.remove(old)?;
            player.id = new.clone();
            player.is_connected = true;

            if room.host_id == *old {
                room.host_id = new.clone();
            }
            for slot in room.turn_order.iter_mut() {
                if slot == old {
                    *slot = new.clone();
                }
            }
            if let Some(clue) = room.clues.remove(old) {
                room.clues.insert(new.clone(), clue);
            }
            if let Some(target) = room.votes.remove(old) {
                room.votes.insert(new.clone(), target);
            }
            for target in room.votes.values_mut() {
                if target == old {
                    *target = new.clone();
                }
            }
            if room.eliminated.remove(old) {
                room.eliminated.insert(new.clone());
            }
            if room.ready_players.remove(old) {
                room.ready_players.insert(new.clone());
            }

            self.tokens
                .insert(player.session_token.clone(), (code.clone(), new.clone()));
            room.players.insert(new.clone(), player);
        }

        self.player_rooms.remove(old);
        self.player_rooms.insert(new.clone(), code.clone());
        debug!(code = %code, old = %old, new = %new, "player rebound");

        self.rooms.get(code).and_then(|r| r.players.get(&new))
    }

    /// Resolves a session token to its room and player id.
    pub fn lookup_token(
        &self,
        token: &SessionToken,
    ) -> Option<(&RoomCode, &PlayerId)> {
        self.tokens.get(token).map(|(c, p)| (c, p))
    }

    pub fn remove_token(&mut self, token: &SessionToken) {
        self.tokens.remove(token);
    }

    // -----------------------------------------------------------------------
    // Room lifetime timers
    // -----------------------------------------------------------------------

    /// Arms the empty-room grace timer, replacing any prior one.
    pub fn schedule_room_deletion(&mut self, code: &RoomCode) {
        if let Some(prior) = self.pending_deletions.remove(code) {
            self.scheduler.cancel(prior);
        }
        let key = self
            .scheduler
            .schedule(EMPTY_ROOM_GRACE, RoomTimer::DeleteRoom(code.clone()));
        self.pending_deletions.insert(code.clone(), key);
        debug!(code = %code, "room deletion scheduled");
    }

    /// Cancels a pending deletion. Safe when none is armed.
    pub fn cancel_scheduled_deletion(&mut self, code: &RoomCode) -> bool {
        match self.pending_deletions.remove(code) {
            Some(key) => {
                self.scheduler.cancel(key);
                debug!(code = %code, "room deletion cancelled");
                true
            }
            None => false,
        }
    }

    /// Arms the reveal-readiness timeout, replacing any prior one for
    /// the room.
    pub fn arm_reveal_timeout(&mut self, code: &RoomCode) {
        let Some(room) = self.rooms.get_mut(code) else {
            return;
        };
        if let Some(prior) = room.ready_timeout.take() {
            self.scheduler.cancel(prior);
        }
        let key = self
            .scheduler
            .schedule(REVEAL_TIMEOUT, RoomTimer::RevealTimeout(code.clone()));
        room.ready_timeout = Some(key);
    }

    /// Disarms the reveal-readiness timeout, if armed.
    pub fn clear_reveal_timeout(&mut self, code: &RoomCode) {
        let Some(room) = self.rooms.get_mut(code) else {
            return;
        };
        if let Some(key) = room.ready_timeout.take() {
            self.scheduler.cancel(key);
        }
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    /// Removes a room and every index entry that pointed into it.
    pub fn delete_room(&mut self, code: &RoomCode) -> Option<Room> {
        self.cancel_scheduled_deletion(code);
        let room = self.rooms.remove(code)?;
        for id in room.players.keys() {
            self.player_rooms.remove(id);
        }
        self.tokens.retain(|_, (c, _)| c != code);
        info!(code = %code, "room deleted");
        Some(room)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Builds the player list clients see in `room-updated` events,
    /// ordered by name for a stable presentation.
    pub fn serialize_players(room: &Room) -> Vec<PlayerSummary> {
        let mut summaries: Vec<PlayerSummary> = room
            .players
            .values()
            .map(|p| PlayerSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                is_host: p.id == room.host_id,
                is_alive: p.is_alive,
                is_eliminated: room.eliminated.contains(&p.id),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }
}
