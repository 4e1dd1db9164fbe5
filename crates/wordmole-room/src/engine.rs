//! The pure game engine: role assignment, turn advancement, vote
//! resolution, and victory checks.
//!
//! Every function here is a pure computation over the `Room` it is
//! given — no I/O, no registry access, no timers. Randomness is
//! injected so tests can run seeded.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;

use wordmole_protocol::{PlayerId, Role, TurnDirection, Winner};

use crate::{Room, RoomError};

// ---------------------------------------------------------------------------
// Role assignment
// ---------------------------------------------------------------------------

/// Assigns roles and fixes the turn order for a new game.
///
/// The effective impostor count is `min(config.impostor_count,
/// player_count - 1)`, guaranteeing at least one civilian. Two
/// independent Fisher–Yates shuffles are drawn over the same id set:
/// one decides who the impostors are, the other becomes `turn_order`,
/// so seat order leaks nothing about roles. Resets every player to
/// alive and the turn pointer to 0.
///
/// # Errors
/// [`RoomError::MissingConfig`] if the host never configured the game.
pub fn assign_roles<R: Rng + ?Sized>(
    room: &mut Room,
    rng: &mut R,
) -> Result<(), RoomError> {
    let requested = room
        .config
        .as_ref()
        .ok_or(RoomError::MissingConfig)?
        .impostor_count;
    let impostor_count = requested.min(room.players.len().saturating_sub(1));

    let mut role_order: Vec<PlayerId> = room.players.keys().cloned().collect();
    role_order.shuffle(rng);

    for (i, id) in role_order.iter().enumerate() {
        if let Some(player) = room.players.get_mut(id) {
            player.role = Some(if i < impostor_count {
                Role::Impostor
            } else {
                Role::Civil
            });
            player.is_alive = true;
        }
    }

    let mut turn_order = role_order;
    turn_order.shuffle(rng);
    room.turn_order = turn_order;
    room.current_turn_index = 0;

    Ok(())
}

// ---------------------------------------------------------------------------
// Turn advancement
// ---------------------------------------------------------------------------

/// Computes the next turn index from the room's current one.
///
/// Steps `+1` (`right`) or `-1` (`left`) modulo the turn-order length,
/// wrapping, and skipping players who have left, died, or been
/// eliminated. Scans at most one full lap; if no eligible player is
/// found (everyone eliminated), returns the input index unchanged.
pub fn next_turn_index(room: &Room) -> usize {
    let len = room.turn_order.len();
    if len == 0 {
        return room.current_turn_index;
    }

    let mut idx = room.current_turn_index;
    for _ in 0..len {
        idx = match room.turn_direction {
            TurnDirection::Right => (idx + 1) % len,
            TurnDirection::Left => (idx + len - 1) % len,
        };
        if room.is_eligible(&room.turn_order[idx]) {
            return idx;
        }
    }

    room.current_turn_index
}

// ---------------------------------------------------------------------------
// Vote resolution
// ---------------------------------------------------------------------------

/// The result of tallying a voting round.
#[derive(Debug, Clone)]
pub struct VoteOutcome {
    pub eliminated_id: Option<PlayerId>,
    pub eliminated_name: Option<String>,
    pub eliminated_role: Option<Role>,
    /// Snapshot of voter → target for the resolved round.
    pub votes: HashMap<PlayerId, PlayerId>,
    /// `Some(Civiles)` only when the eliminated player was the last
    /// alive impostor — an immediate win regardless of rounds left.
    pub winner: Option<Winner>,
}

/// Tallies the room's votes and applies the elimination, if any.
///
/// The target with the strictly highest vote count is eliminated
/// (`is_alive = false`, added to `eliminated`). Ties for the maximum —
/// including the empty-votes case — eliminate no one.
pub fn resolve_votes(room: &mut Room) -> VoteOutcome {
    let mut tally: HashMap<&PlayerId, usize> = HashMap::new();
    for target in room.votes.values() {
        *tally.entry(target).or_insert(0) += 1;
    }

    let max = tally.values().copied().max().unwrap_or(0);
    let mut leaders = tally
        .iter()
        .filter(|&(_, &count)| count == max && max > 0)
        .map(|(id, _)| (*id).clone());
    let eliminated = match (leaders.next(), leaders.next()) {
        (Some(single), None) => Some(single),
        _ => None, // zero candidates, or a tie for the maximum
    };

    let mut outcome = VoteOutcome {
        eliminated_id: None,
        eliminated_name: None,
        eliminated_role: None,
        votes: room.votes.clone(),
        winner: None,
    };

    let Some(id) = eliminated else {
        return outcome;
    };

    let Some(player) = room.players.get_mut(&id) else {
        return outcome;
    };
    player.is_alive = false;
    outcome.eliminated_name = Some(player.name.clone());
    outcome.eliminated_role = player.role;
    room.eliminated.insert(id.clone());
    outcome.eliminated_id = Some(id);

    if outcome.eliminated_role == Some(Role::Impostor)
        && room.alive_impostor_count() == 0
    {
        outcome.winner = Some(Winner::Civiles);
    }

    outcome
}

// ---------------------------------------------------------------------------
// Victory check
// ---------------------------------------------------------------------------

/// Checks for an end-of-game condition after a round resolves.
///
/// The civilian check runs first: zero alive impostors wins for
/// `civiles` even if the round budget is also exhausted in the same
/// evaluation. Otherwise the impostors win once `current_round` reaches
/// `config.rounds`. Without a config the game never ends by rounds.
pub fn check_victory(room: &Room) -> Option<Winner> {
    if room.alive_impostor_count() == 0 {
        return Some(Winner::Civiles);
    }
    match &room.config {
        Some(config) if room.current_round >= config.rounds => {
            Some(Winner::Impostores)
        }
        _ => None,
    }
}

// =========================================================================
// Tests
// =========================================================================
