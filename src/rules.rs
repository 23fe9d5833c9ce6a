//! Rule engine: legality, mills, captures and end-of-game detection.
//!
//! Everything here works on an explicit `(&Topology, &mut GameState)` pair.
//! Point sets are bitmasks, one bit per point index.

use crate::board::{Topology, bit, bits};
use crate::state::GameState;
use crate::types::{Action, Color, DrawReason, GameOutcome, Highlights, Phase, WinReason};

/// Pieces at which a side may fly anywhere.
pub const FLYING_PIECES: u8 = 3;
/// A side with this many pieces or fewer has lost.
pub const LOSING_PIECES: u8 = 2;
/// Occurrences of one position that end the game in a draw.
pub const REPETITION_LIMIT: u32 = 3;

/// Where the `color` piece on `from` may go.
/// Returns 0 if `from` does not hold a `color` piece.
pub fn legal_destinations(topo: &Topology, state: &GameState, from: usize, color: Color) -> u64 {
    if state.board.get(from) != Some(color) {
        return 0;
    }
    let empty = state.board.empty_mask();
    if state.on_board[color] == FLYING_PIECES {
        empty
    } else {
        topo.neighbors(from) & empty
    }
}

/// True if `pos` belongs to a mill fully held by `color` on the current board.
pub fn forms_mill(topo: &Topology, state: &GameState, pos: usize, color: Color) -> bool {
    let own = state.board.occupied(color);
    topo.mills_through(pos)
        .any(|mill| mill.iter().all(|&p| own & bit(p) != 0))
}

/// Enemy pieces that may be captured. Pieces in a formed mill are protected
/// unless every enemy piece is.
pub fn removable_enemies(topo: &Topology, state: &GameState, enemy: Color) -> u64 {
    let all = state.board.occupied(enemy);
    let unprotected = bits(all)
        .filter(|&pos| !forms_mill(topo, state, pos, enemy))
        .fold(0u64, |mask, pos| mask | bit(pos));

    if unprotected != 0 { unprotected } else { all }
}

pub fn has_any_legal_move(topo: &Topology, state: &GameState, color: Color) -> bool {
    let empty = state.board.empty_mask();
    if empty == 0 {
        return false;
    }
    if state.on_board[color] == FLYING_PIECES {
        return true;
    }
    bits(state.board.occupied(color)).any(|pos| topo.neighbors(pos) & empty != 0)
}

/// Guard for leaving the placing phase.
pub fn both_hands_empty(state: &GameState) -> bool {
    Color::ALL.iter().all(|&color| state.in_hand[color] == 0)
}

/// Judges the position right after `after` finished acting.
///
/// Only the moving phase is judged. Priority: opponent down to two pieces,
/// opponent blocked, then threefold repetition.
pub fn evaluate_game_over(topo: &Topology, state: &GameState, after: Color) -> Option<GameOutcome> {
    if state.phase != Phase::Moving {
        return None;
    }

    let opponent = after.opponent();
    if state.on_board[opponent] <= LOSING_PIECES {
        return Some(GameOutcome::Win {
            winner: after,
            reason: WinReason::OpponentMajorityLoss,
        });
    }
    if !has_any_legal_move(topo, state, opponent) {
        return Some(GameOutcome::Win {
            winner: after,
            reason: WinReason::OpponentStalemate,
        });
    }
    if state.repetitions() >= REPETITION_LIMIT {
        return Some(GameOutcome::Draw {
            reason: DrawReason::Repetition,
        });
    }
    None
}

/// Routes a click on `pos` to the handler for the current phase.
pub fn dispatch(topo: &Topology, state: &mut GameState, pos: usize) -> Action {
    if state.is_over() || pos >= topo.len() {
        return Action::Rejected;
    }
    match state.phase {
        Phase::Placing => place(topo, state, pos),
        Phase::Moving => move_or_select(topo, state, pos),
        Phase::Removing => remove(topo, state, pos),
    }
}

/// Drops a piece from the current player's hand onto `pos`.
pub fn place(topo: &Topology, state: &mut GameState, pos: usize) -> Action {
    let color = state.current;
    if state.board.get(pos).is_some() || state.in_hand[color] == 0 {
        return Action::Rejected;
    }

    state.board.set(pos, Some(color));
    state.in_hand[color] -= 1;
    state.on_board[color] += 1;
    state.record_position();

    if grants_capture(topo, state, pos, color) {
        return enter_removing(state, pos);
    }

    if both_hands_empty(state) {
        enter_moving(state);
        if let Some(outcome) = settle(topo, state) {
            return Action::GameOver(outcome);
        }
    }

    switch_turn(state);
    Action::Continue
}

/// Selects, deselects or moves a piece in the moving phase.
pub fn move_or_select(topo: &Topology, state: &mut GameState, pos: usize) -> Action {
    let color = state.current;
    let occupant = state.board.get(pos);

    let Some(from) = state.selected else {
        if occupant == Some(color) {
            state.selected = Some(pos);
            return Action::Continue;
        }
        return Action::Rejected;
    };

    if pos == from {
        state.selected = None;
        return Action::Continue;
    }

    if occupant.is_none() && legal_destinations(topo, state, from, color) & bit(pos) != 0 {
        state.board.set(from, None);
        state.board.set(pos, Some(color));
        state.selected = None;
        state.record_position();

        if grants_capture(topo, state, pos, color) {
            return enter_removing(state, pos);
        }
        if let Some(outcome) = settle(topo, state) {
            return Action::GameOver(outcome);
        }
        switch_turn(state);
        return Action::Continue;
    }

    if occupant == Some(color) {
        state.selected = Some(pos);
        return Action::Continue;
    }
    Action::Rejected
}

/// Captures the enemy piece on `pos` after a mill.
pub fn remove(topo: &Topology, state: &mut GameState, pos: usize) -> Action {
    let enemy = state.current.opponent();
    if state.board.get(pos) != Some(enemy) || removable_enemies(topo, state, enemy) & bit(pos) == 0 {
        return Action::Rejected;
    }

    state.board.set(pos, None);
    state.on_board[enemy] -= 1;
    state.record_position();
    tracing::debug!(capturer = %state.current, pos, remaining = state.on_board[enemy], "piece captured");

    // Nothing is judged while removing; the phase decides what comes next.
    if both_hands_empty(state) {
        enter_moving(state);
        if let Some(outcome) = settle(topo, state) {
            return Action::GameOver(outcome);
        }
    } else {
        state.phase = Phase::Placing;
    }

    switch_turn(state);
    Action::Continue
}

/// Points the UI should highlight for the current state.
pub fn highlights(topo: &Topology, state: &GameState) -> Highlights {
    if state.is_over() {
        return Highlights::default();
    }
    let to_points = |mask: u64| bits(mask).map(|pos| pos as u8).collect::<Vec<_>>();
    let color = state.current;

    Highlights {
        selectable: match state.phase {
            Phase::Moving => to_points(state.board.occupied(color)),
            _ => Vec::new(),
        },
        destinations: state
            .selected
            .map(|from| to_points(legal_destinations(topo, state, from, color)))
            .unwrap_or_default(),
        removable: match state.phase {
            Phase::Removing => to_points(removable_enemies(topo, state, color.opponent())),
            _ => Vec::new(),
        },
    }
}

/// A fresh mill at `pos` earns a capture only if there is something to take.
fn grants_capture(topo: &Topology, state: &GameState, pos: usize, color: Color) -> bool {
    // An empty enemy board would otherwise leave the game waiting in Removing forever.
    forms_mill(topo, state, pos, color) && state.on_board[color.opponent()] > 0
}

fn enter_removing(state: &mut GameState, pos: usize) -> Action {
    state.phase = Phase::Removing;
    tracing::debug!(color = %state.current, pos, "mill formed");
    Action::MillFormed
}

fn enter_moving(state: &mut GameState) {
    state.phase = Phase::Moving;
    tracing::debug!("all pieces placed, moving phase begins");
}

/// Stores the outcome if the game just ended. The turn is not switched.
fn settle(topo: &Topology, state: &mut GameState) -> Option<GameOutcome> {
    let outcome = evaluate_game_over(topo, state, state.current)?;
    state.outcome = Some(outcome);
    tracing::info!(winner = ?outcome.winner(), draw = outcome.is_draw(), ?outcome, "game over");
    Some(outcome)
}

fn switch_turn(state: &mut GameState) {
    state.selected = None;
    state.current = !state.current;
}
