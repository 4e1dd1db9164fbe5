//! Reveal and clue-phase handlers: readiness confirmations and clue
//! submission with turn advancement.

use tracing::debug;

use wordmole_protocol::{Phase, PlayerId, RoomCode, ServerEvent};
use wordmole_room::next_turn_index;

use crate::error::ActionError;
use crate::handlers::{turn_event, GameServer};
use crate::sink::EventSink;
use crate::words::WordService;

impl<S: EventSink, W: WordService> GameServer<S, W> {
    // -----------------------------------------------------------------------
    // player-ready
    // -----------------------------------------------------------------------

    /// Records a readiness confirmation during the reveal phase. When
    /// every alive player has confirmed, the first turn begins without
    /// waiting for the reveal timeout. Confirmations outside the reveal
    /// phase, or from ineligible players, are dropped.
    pub fn player_ready(&mut self, sender: &PlayerId) {
        let Some(code) = self.code_of(sender) else {
            return;
        };
        let Some(room) = self.rooms.room_mut(&code) else {
            return;
        };
        if room.phase != Phase::Reveal {
            debug!(code = %code, player = %sender, "ready outside reveal, dropped");
            return;
        }
        if !room.is_eligible(sender) {
            return;
        }

        room.ready_players.insert(sender.clone());
        if room.ready_players.len() >= room.alive_count() {
            self.begin_first_turn(&code);
        }
    }

    /// Moves a reveal-phase room into the clue phase and announces the
    /// first turn. Reached by full readiness or by the reveal timeout;
    /// a second arrival is a no-op since the phase has already moved.
    pub(crate) fn begin_first_turn(&mut self, code: &RoomCode) {
        self.rooms.clear_reveal_timeout(code);
        let Some(room) = self.rooms.room_mut(code) else {
            return;
        };
        if room.phase != Phase::Reveal {
            return;
        }

        room.phase = Phase::CluePhase;
        room.current_turn_index = room.first_alive_turn_index();
        let event = turn_event(room);
        if let Some(event) = event {
            self.broadcast(code, event);
        }
    }

    // -----------------------------------------------------------------------
    // submit-clue
    // -----------------------------------------------------------------------

    /// Accepts the current player's clue, broadcasts it, and either
    /// advances the turn or opens voting once every alive player has
    /// submitted. Out-of-turn submissions are dropped without an error:
    /// they are a client race, not a protocol violation.
    pub fn submit_clue(
        &mut self,
        sender: &PlayerId,
        text: String,
    ) -> Result<(), ActionError> {
        let code = self.code_of(sender).ok_or(ActionError::RoomNotFound)?;
        let room = self.rooms.room_mut(&code).ok_or(ActionError::RoomNotFound)?;
        if room.phase != Phase::CluePhase {
            return Err(ActionError::WrongPhase);
        }
        if room.current_turn_player() != Some(sender) || !room.is_eligible(sender) {
            debug!(code = %code, player = %sender, "clue out of turn, dropped");
            return Ok(());
        }
        let Some(player_name) = room.players.get(sender).map(|p| p.name.clone())
        else {
            return Ok(());
        };

        room.clues.insert(sender.clone(), text.clone());

        let everyone_done = room.clues.len() >= room.alive_count();
        let next = if everyone_done {
            room.phase = Phase::Voting;
            None
        } else {
            room.current_turn_index = next_turn_index(room);
            turn_event(room)
        };

        self.broadcast(
            &code,
            ServerEvent::ClueSubmitted {
                player_id: sender.clone(),
                player_name,
                clue: text,
            },
        );
        if everyone_done {
            self.broadcast(&code, ServerEvent::VotingStarted);
        } else if let Some(event) = next {
            self.broadcast(&code, event);
        }
        Ok(())
    }
}
