use wasm_bindgen::prelude::*;

pub mod board;
pub mod error;
pub mod game;
pub mod mode;
pub mod rules;
pub mod state;
pub mod types;
pub mod wasm;

pub use board::{Board, Point, Topology};
pub use error::{ConfigError, TopologyError};
pub use game::GameSession;
pub use mode::{Mode, ModeConfig};
pub use state::{ByColor, GameState, PositionKey};
pub use types::{Action, Color, DrawReason, GameOutcome, GameView, Phase, WinReason};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
