use std::ops::{Index, IndexMut};

use rustc_hash::FxHashMap;

use crate::board::Board;
use crate::types::{Color, ColorCounts, GameOutcome, Phase};

/// One value per color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByColor<T> {
    pub blue: T,
    pub green: T,
}

impl<T: Copy> ByColor<T> {
    pub fn splat(value: T) -> Self {
        Self {
            blue: value,
            green: value,
        }
    }
}

impl<T> Index<Color> for ByColor<T> {
    type Output = T;

    fn index(&self, color: Color) -> &T {
        match color {
            Color::Blue => &self.blue,
            Color::Green => &self.green,
        }
    }
}

impl<T> IndexMut<Color> for ByColor<T> {
    fn index_mut(&mut self, color: Color) -> &mut T {
        match color {
            Color::Blue => &mut self.blue,
            Color::Green => &mut self.green,
        }
    }
}

impl From<ByColor<u8>> for ColorCounts {
    fn from(counts: ByColor<u8>) -> Self {
        ColorCounts {
            blue: counts.blue,
            green: counts.green,
        }
    }
}

/// Everything that identifies a position for the repetition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pub blue: u64,
    pub green: u64,
    pub current: Color,
    pub on_board: ByColor<u8>,
    pub phase: Phase,
}

/// Mutable state of one game. Owned by the session, mutated through `rules`.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub current: Color,
    pub phase: Phase,
    pub in_hand: ByColor<u8>,
    pub on_board: ByColor<u8>,
    /// Piece picked up in the moving phase.
    pub selected: Option<usize>,
    /// Occurrences of each position reached while moving.
    pub history: FxHashMap<PositionKey, u32>,
    pub outcome: Option<GameOutcome>,
}

impl GameState {
    /// Zeroed state: empty board, full hands, `starter` to place.
    pub fn new(points: usize, pieces_per_side: u8, starter: Color) -> Self {
        Self {
            board: Board::new(points),
            current: starter,
            phase: Phase::Placing,
            in_hand: ByColor::splat(pieces_per_side),
            on_board: ByColor::splat(0),
            selected: None,
            history: FxHashMap::default(),
            outcome: None,
        }
    }

    pub fn position_key(&self) -> PositionKey {
        PositionKey {
            blue: self.board.occupied(Color::Blue),
            green: self.board.occupied(Color::Green),
            current: self.current,
            on_board: self.on_board,
            phase: self.phase,
        }
    }

    pub fn repetitions(&self) -> u32 {
        self.history
            .get(&self.position_key())
            .copied()
            .unwrap_or(0)
    }

    /// Counts the current position, but only once the moving phase has begun.
    pub fn record_position(&mut self) {
        if self.phase != Phase::Moving {
            return;
        }
        *self.history.entry(self.position_key()).or_insert(0) += 1;
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Whether counters agree with the board.
    pub fn is_consistent(&self) -> bool {
        Color::ALL
            .iter()
            .all(|&color| self.on_board[color] == self.board.count(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_zeroed() {
        let state = GameState::new(24, 9, Color::Green);

        assert_eq!(state.current, Color::Green);
        assert_eq!(state.phase, Phase::Placing);
        assert_eq!(state.in_hand, ByColor::splat(9));
        assert_eq!(state.on_board, ByColor::splat(0));
        assert_eq!(state.board.empty_count(), 24);
        assert!(state.history.is_empty());
        assert!(!state.is_over());
        assert!(state.is_consistent());
    }

    #[test]
    fn positions_are_only_recorded_while_moving() {
        let mut state = GameState::new(24, 9, Color::Blue);
        state.record_position();
        assert!(state.history.is_empty());

        state.phase = Phase::Moving;
        state.record_position();
        state.record_position();
        assert_eq!(state.repetitions(), 2);

        state.current = Color::Green;
        assert_eq!(state.repetitions(), 0);
    }

    #[test]
    fn inconsistent_counters_are_detected() {
        let mut state = GameState::new(24, 9, Color::Blue);
        state.board.set(0, Some(Color::Blue));
        assert!(!state.is_consistent());

        state.on_board[Color::Blue] = 1;
        assert!(state.is_consistent());
    }
}
