use std::fmt;
use std::ops::Not;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Piece color. Cell encoding in views: 0=empty, 1=blue, 2=green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Blue,
    Green,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Blue, Color::Green];

    pub fn opponent(self) -> Self {
        match self {
            Color::Blue => Color::Green,
            Color::Green => Color::Blue,
        }
    }

    pub fn cell_value(self) -> u8 {
        match self {
            Color::Blue => 1,
            Color::Green => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Green => "green",
        }
    }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(Color::Blue),
            "green" => Ok(Color::Green),
            _ => Err(ConfigError::UnknownColor(s.to_string())),
        }
    }
}

/// Turn phase. Every click is routed by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Placing,
    Moving,
    Removing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinReason {
    /// The loser is down to two pieces on the board.
    OpponentMajorityLoss,
    /// The loser has no legal move.
    OpponentStalemate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawReason {
    Repetition,
}

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum GameOutcome {
    Win { winner: Color, reason: WinReason },
    Draw { reason: DrawReason },
}

impl GameOutcome {
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameOutcome::Win { winner, .. } => Some(*winner),
            GameOutcome::Draw { .. } => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, GameOutcome::Draw { .. })
    }
}

/// What a single click did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "outcome", rename_all = "camelCase")]
pub enum Action {
    /// Illegal or ignored input. The state is unchanged.
    Rejected,
    /// The state changed and play continues.
    Continue,
    /// The mover completed a mill and must now capture.
    MillFormed,
    GameOver(GameOutcome),
}

impl Action {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Action::Rejected)
    }
}

/// Per-color counters as exposed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorCounts {
    pub blue: u8,
    pub green: u8,
}

/// Points the UI should mark, all as point indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Highlights {
    /// Own pieces that may be picked up (moving phase only).
    pub selectable: Vec<u8>,
    /// Legal destinations of the selected piece.
    pub destinations: Vec<u8>,
    /// Enemy pieces that may be captured (removing phase only).
    pub removable: Vec<u8>,
}

/// Public game state returned after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub mode_key: String,
    /// One cell per point: 0=empty, 1=blue, 2=green.
    pub board: Vec<u8>,
    pub current: Color,
    pub phase: Phase,
    pub in_hand: ColorCounts,
    pub on_board: ColorCounts,
    pub selected: Option<u8>,
    pub highlights: Highlights,
    pub outcome: Option<GameOutcome>,
    /// Result of the latest click, `None` right after a reset.
    pub last_action: Option<Action>,
}
