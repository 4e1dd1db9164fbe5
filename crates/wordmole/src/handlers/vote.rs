//! Voting handlers: vote collection, round resolution, and the
//! round-end / game-over transition.

use tracing::{debug, info};

use wordmole_protocol::{
    Phase, PlayerId, RoleReveal, RoomCode, RoundResult, ServerEvent, Winner,
};
use wordmole_room::{check_victory, resolve_votes, RoomRegistry};

use crate::error::ActionError;
use crate::handlers::{turn_event, GameServer};
use crate::sink::EventSink;
use crate::words::WordService;

impl<S: EventSink, W: WordService> GameServer<S, W> {
    // -----------------------------------------------------------------------
    // submit-vote
    // -----------------------------------------------------------------------

    /// Records a vote and announces that the voter has voted (not for
    /// whom). The round resolves once every alive player has voted.
    /// Duplicate votes, self-votes, and votes by or against ineligible
    /// players are dropped: client races, not protocol violations.
    pub fn submit_vote(
        &mut self,
        sender: &PlayerId,
        target: PlayerId,
    ) -> Result<(), ActionError> {
        let code = self.code_of(sender).ok_or(ActionError::RoomNotFound)?;
        let room = self.rooms.room_mut(&code).ok_or(ActionError::RoomNotFound)?;
        if room.phase != Phase::Voting {
            return Err(ActionError::WrongPhase);
        }
        let valid = room.is_eligible(sender)
            && room.is_eligible(&target)
            && target != *sender
            && !room.votes.contains_key(sender);
        if !valid {
            debug!(code = %code, voter = %sender, "invalid vote, dropped");
            return Ok(());
        }

        room.votes.insert(sender.clone(), target);
        let all_voted = room.votes.len() >= room.alive_count();

        self.broadcast(
            &code,
            ServerEvent::VoteCast {
                voter_id: sender.clone(),
            },
        );
        if all_voted {
            self.resolve_round(&code);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Round resolution
    // -----------------------------------------------------------------------

    /// Tallies the round, broadcasts the result, and either ends the
    /// game or starts the next round's clue phase.
    fn resolve_round(&mut self, code: &RoomCode) {
        let Some(room) = self.rooms.room_mut(code) else {
            return;
        };

        let outcome = resolve_votes(room);
        let winner = outcome.winner.or_else(|| check_victory(room));
        room.phase = Phase::RoundEnd;

        let result = RoundResult {
            eliminated_id: outcome.eliminated_id,
            eliminated_name: outcome.eliminated_name,
            eliminated_role: outcome.eliminated_role,
            votes: outcome.votes,
            winner: outcome.winner,
            round: room.current_round,
            players: RoomRegistry::serialize_players(room),
        };
        self.broadcast(code, ServerEvent::RoundResult(result));

        match winner {
            Some(winner) => self.finish_game(code, winner),
            None => self.next_round(code),
        }
    }

    fn finish_game(&mut self, code: &RoomCode, winner: Winner) {
        let Some(room) = self.rooms.room_mut(code) else {
            return;
        };
        room.phase = Phase::GameOver;

        let roles = room
            .players
            .values()
            .filter_map(|p| {
                p.role.map(|role| RoleReveal {
                    player_id: p.id.clone(),
                    name: p.name.clone(),
                    role,
                })
            })
            .collect();
        let word = room.word.clone();

        info!(code = %code, winner = %winner_label(winner), "game over");
        self.broadcast(code, ServerEvent::GameOver { winner, roles, word });
    }

    fn next_round(&mut self, code: &RoomCode) {
        let Some(room) = self.rooms.room_mut(code) else {
            return;
        };
        room.current_round += 1;
        room.clues.clear();
        room.votes.clear();
        room.phase = Phase::CluePhase;
        room.current_turn_index = room.first_alive_turn_index();

        let event = turn_event(room);
        if let Some(event) = event {
            self.broadcast(code, event);
        }
    }
}

fn winner_label(winner: Winner) -> &'static str {
    match winner {
        Winner::Civiles => "civiles",
        Winner::Impostores => "impostores",
    }
}
