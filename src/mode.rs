use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::board::{RING_SIZE, Topology};
use crate::error::{ConfigError, TopologyError};

/// Reference canvas the built-in ring distances are measured on.
const CANVAS_PX: f64 = 2048.0;

static BUILTIN_MODES: Lazy<Vec<Mode>> = Lazy::new(|| {
    vec![
        Mode {
            key: "m32".to_string(),
            name: "32-Point".to_string(),
            rings: 4,
            distances: [720.0, 540.0, 360.0, 180.0]
                .iter()
                .map(|d| d / CANVAS_PX)
                .collect(),
            pieces_per_side: 12,
        },
        Mode {
            key: "m9".to_string(),
            name: "Nine Men's".to_string(),
            rings: 3,
            distances: [720.0, 540.0, 360.0]
                .iter()
                .map(|d| d / CANVAS_PX)
                .collect(),
            pieces_per_side: 9,
        },
    ]
});

/// A playable board variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub key: String,
    pub name: String,
    pub rings: usize,
    /// Half-size of each ring square, outermost first, relative to a unit board.
    pub distances: Vec<f64>,
    pub pieces_per_side: u8,
}

/// A user-defined mode coming from the UI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub rings: usize,
    pub distances: Vec<f64>,
    pub pieces_per_side: u8,
}

impl Mode {
    pub fn builtins() -> &'static [Mode] {
        &BUILTIN_MODES
    }

    pub fn builtin(key: &str) -> Result<Mode, ConfigError> {
        BUILTIN_MODES
            .iter()
            .find(|mode| mode.key == key)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownMode(key.to_string()))
    }

    /// Validates a custom mode. The board must hold both full hands.
    pub fn custom(config: ModeConfig) -> Result<Mode, ConfigError> {
        if config.pieces_per_side == 0 {
            return Err(ConfigError::NoPieces);
        }
        // Rejects oversized ring counts before any point arithmetic.
        let points = Topology::build(config.rings, &config.distances)?.len();
        if 2 * config.pieces_per_side as usize > points {
            return Err(ConfigError::TooManyPieces {
                pieces_per_side: config.pieces_per_side,
                points,
            });
        }

        Ok(Mode {
            key: "custom".to_string(),
            name: config
                .name
                .unwrap_or_else(|| format!("{} rings", config.rings)),
            rings: config.rings,
            distances: config.distances,
            pieces_per_side: config.pieces_per_side,
        })
    }

    pub fn points(&self) -> usize {
        self.rings.saturating_mul(RING_SIZE)
    }

    pub fn topology(&self) -> Result<Topology, TopologyError> {
        Topology::build(self.rings, &self.distances)
    }
}

impl Default for Mode {
    fn default() -> Self {
        BUILTIN_MODES[0].clone()
    }
}
