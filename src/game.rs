use crate::board::Topology;
use crate::error::TopologyError;
use crate::mode::Mode;
use crate::rules;
use crate::state::GameState;
use crate::types::{Action, Color, GameOutcome, GameView};

/// One game session: the active mode, its board graph and the game state.
///
/// The session is the only owner of the state; every mutation goes through
/// [`rules::dispatch`].
#[derive(Debug)]
pub struct GameSession {
    mode: Mode,
    topology: Topology,
    state: GameState,
    starter: Color,
    last_action: Option<Action>,
}

impl GameSession {
    pub fn new(mode: Mode, starter: Color) -> Result<Self, TopologyError> {
        let topology = mode.topology()?;
        let state = GameState::new(topology.len(), mode.pieces_per_side, starter);
        tracing::debug!(mode = %mode.key, %starter, "session created");
        Ok(Self {
            mode,
            topology,
            state,
            starter,
            last_action: None,
        })
    }

    /// Switches to `mode` and starts a fresh game with the same starter.
    /// On error the session is left untouched.
    pub fn apply_mode(&mut self, mode: Mode) -> Result<(), TopologyError> {
        self.install(mode, self.starter)
    }

    /// Starts over with `starter` to move, optionally on a new mode.
    pub fn reset(&mut self, starter: Color, mode: Option<Mode>) -> Result<(), TopologyError> {
        match mode {
            Some(mode) if mode != self.mode => self.install(mode, starter),
            _ => {
                self.starter = starter;
                self.last_action = None;
                self.state =
                    GameState::new(self.topology.len(), self.mode.pieces_per_side, starter);
                Ok(())
            }
        }
    }

    fn install(&mut self, mode: Mode, starter: Color) -> Result<(), TopologyError> {
        let topology = mode.topology()?;
        self.state = GameState::new(topology.len(), mode.pieces_per_side, starter);
        self.topology = topology;
        self.mode = mode;
        self.starter = starter;
        self.last_action = None;
        tracing::debug!(mode = %self.mode.key, points = self.topology.len(), "mode applied");
        Ok(())
    }

    /// Handles a click on point `pos`.
    pub fn click(&mut self, pos: usize) -> Action {
        let action = rules::dispatch(&self.topology, &mut self.state, pos);
        debug_assert!(self.state.is_consistent());
        self.last_action = Some(action);
        action
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn starter(&self) -> Color {
        self.starter
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.state.outcome
    }

    pub fn to_view(&self) -> GameView {
        let state = &self.state;
        GameView {
            mode_key: self.mode.key.clone(),
            board: state.board.to_array(),
            current: state.current,
            phase: state.phase,
            in_hand: state.in_hand.into(),
            on_board: state.on_board.into(),
            selected: state.selected.map(|pos| pos as u8),
            highlights: rules::highlights(&self.topology, state),
            outcome: state.outcome,
            last_action: self.last_action,
        }
    }

    #[cfg(test)]
    fn set_state_for_test(&mut self, state: GameState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::mode::ModeConfig;
    use crate::state::ByColor;
    use crate::types::{Phase, WinReason};

    fn m9() -> Mode {
        Mode::builtin("m9").unwrap()
    }

    #[test]
    fn initial_state_is_correct() {
        let session = GameSession::new(Mode::default(), Color::Blue).unwrap();
        let view = session.to_view();

        assert_eq!(view.mode_key, "m32");
        assert_eq!(view.board, vec![0; 32]);
        assert_eq!(view.current, Color::Blue);
        assert_eq!(view.phase, Phase::Placing);
        assert_eq!(view.in_hand.blue, 12);
        assert_eq!(view.in_hand.green, 12);
        assert_eq!(view.on_board.blue, 0);
        assert_eq!(view.selected, None);
        assert!(view.highlights.selectable.is_empty());
        assert_eq!(view.outcome, None);
        assert_eq!(view.last_action, None);
    }

    #[test]
    fn view_reports_the_latest_click() {
        let mut session = GameSession::new(m9(), Color::Blue).unwrap();

        session.click(0);
        assert_eq!(session.to_view().last_action, Some(Action::Continue));
        session.click(0);
        assert_eq!(session.to_view().last_action, Some(Action::Rejected));

        session.reset(Color::Blue, None).unwrap();
        assert_eq!(session.to_view().last_action, None);
    }

    #[test]
    fn t01_placement_alternates_turns() {
        let mut session = GameSession::new(m9(), Color::Green).unwrap();

        assert_eq!(session.click(0), Action::Continue);
        assert_eq!(session.state().current, Color::Blue);
        // Occupied and out-of-range points are ignored.
        assert_eq!(session.click(0), Action::Rejected);
        assert_eq!(session.click(24), Action::Rejected);
        assert_eq!(session.state().current, Color::Blue);

        let view = session.to_view();
        assert_eq!(view.board[0], 2);
        assert_eq!(view.in_hand.green, 8);
        assert_eq!(view.on_board.green, 1);
    }

    #[test]
    fn t02_reset_keeps_mode_and_restores_hands() {
        let mut session = GameSession::new(m9(), Color::Blue).unwrap();
        session.click(0);
        session.click(1);

        session.reset(Color::Green, None).unwrap();

        assert_eq!(session.mode().key, "m9");
        assert_eq!(session.starter(), Color::Green);
        assert_eq!(session.state(), &GameState::new(24, 9, Color::Green));
    }

    #[test]
    fn t03_mode_change_replaces_topology_and_state() {
        let mut session = GameSession::new(m9(), Color::Blue).unwrap();
        session.click(5);

        session.reset(Color::Blue, Some(Mode::default())).unwrap();

        assert_eq!(session.topology().len(), 32);
        assert_eq!(session.state().board.len(), 32);
        assert_eq!(session.state().in_hand, ByColor::splat(12));
        assert_eq!(session.state().board.empty_count(), 32);
    }

    #[test]
    fn failed_mode_change_leaves_session_untouched() {
        let mut session = GameSession::new(m9(), Color::Blue).unwrap();
        session.click(5);
        let before = session.state().clone();

        let broken = Mode {
            distances: vec![0.3],
            ..Mode::default()
        };
        assert!(session.apply_mode(broken).is_err());

        assert_eq!(session.mode().key, "m9");
        assert_eq!(session.topology().len(), 24);
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn clicks_after_game_over_are_ignored() {
        let mut session = GameSession::new(m9(), Color::Blue).unwrap();
        let mut state = GameState::new(24, 0, Color::Blue);
        state.board = Board::from_bitboards(0b1111 << 4, 0b1111, 24);
        state.on_board = ByColor::splat(4);
        state.phase = Phase::Moving;
        state.outcome = Some(GameOutcome::Win {
            winner: Color::Blue,
            reason: WinReason::OpponentStalemate,
        });
        session.set_state_for_test(state.clone());

        assert_eq!(session.click(4), Action::Rejected);
        assert_eq!(session.state(), &state);
        assert!(session.to_view().highlights.selectable.is_empty());
        assert!(session.outcome().is_some());
    }

    #[test]
    fn custom_full_board_ends_in_stalemate() {
        let mode = Mode::custom(ModeConfig {
            name: None,
            rings: 2,
            distances: vec![0.3, 0.15],
            pieces_per_side: 8,
        })
        .unwrap();
        let mut session = GameSession::new(mode, Color::Blue).unwrap();

        // Blue takes every corner, Green every mid-edge: no side is ever a mill.
        let blue = [0, 1, 2, 3, 8, 9, 10, 11];
        let green = [4, 5, 6, 7, 12, 13, 14, 15];
        for (b, g) in blue.iter().zip(green.iter()) {
            assert_eq!(session.click(*b), Action::Continue);
            let action = session.click(*g);
            if *g != 15 {
                assert_eq!(action, Action::Continue);
            }
        }

        let state = session.state();
        assert_eq!(state.phase, Phase::Moving);
        assert_eq!(state.board.empty_count(), 0);
        for pos in 0..16 {
            assert_eq!(
                rules::legal_destinations(session.topology(), state, pos, Color::Blue),
                0
            );
        }
        assert_eq!(
            session.outcome(),
            Some(GameOutcome::Win {
                winner: Color::Green,
                reason: WinReason::OpponentStalemate
            })
        );
    }
}
