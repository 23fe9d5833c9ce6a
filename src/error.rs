use thiserror::Error;

/// A mode descriptor that cannot produce a board.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("a board needs at least one ring")]
    ZeroRings,

    #[error("{rings} rings exceed the supported maximum of {max}")]
    TooManyRings { rings: usize, max: usize },

    #[error("expected one distance per ring: {rings} rings, {distances} distances")]
    DistanceCount { rings: usize, distances: usize },

    #[error("ring {ring} has invalid distance {distance}")]
    InvalidDistance { ring: usize, distance: f64 },
}

/// Bad configuration input from the UI side.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    #[error("unknown color: {0}")]
    UnknownColor(String),

    #[error("pieces per side must be positive")]
    NoPieces,

    #[error("{pieces_per_side} pieces per side do not fit on {points} points")]
    TooManyPieces { pieces_per_side: u8, points: usize },

    #[error(transparent)]
    Topology(#[from] TopologyError),
}
