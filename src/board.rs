use serde::Serialize;

use crate::error::TopologyError;
use crate::types::Color;

/// Points per ring.
pub const RING_SIZE: usize = 8;
/// Occupancy lives in `u64` bitboards, so at most 64 points.
pub const MAX_RINGS: usize = 64 / RING_SIZE;

// Ring-local slots. Corners first, then mid-edges.
pub const NW: usize = 0;
pub const NE: usize = 1;
pub const SE: usize = 2;
pub const SW: usize = 3;
pub const N: usize = 4;
pub const E: usize = 5;
pub const S: usize = 6;
pub const W: usize = 7;

/// Walk around one ring; consecutive entries share an edge (cyclic).
const PERIMETER: [usize; RING_SIZE] = [NW, N, NE, E, SE, S, SW, W];
/// Mid-edge slots, the only ones joined across rings.
const SPOKES: [usize; 4] = [N, E, S, W];
const SIDES: [[usize; 3]; 4] = [[NW, N, NE], [NE, E, SE], [SE, S, SW], [SW, W, NW]];

/// Normalized board coordinate in `[0, 1]`, used only for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Immutable point graph of one board mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    rings: usize,
    positions: Vec<Point>,
    adjacency: Vec<u64>,
    mills: Vec<[usize; 3]>,
    mills_through: Vec<Vec<usize>>,
}

impl Topology {
    /// Builds the graph for `rings` concentric squares, outermost first.
    /// `distances` are half-sizes of each square and only affect `positions`.
    pub fn build(rings: usize, distances: &[f64]) -> Result<Self, TopologyError> {
        if rings == 0 {
            return Err(TopologyError::ZeroRings);
        }
        if rings > MAX_RINGS {
            return Err(TopologyError::TooManyRings {
                rings,
                max: MAX_RINGS,
            });
        }
        if distances.len() != rings {
            return Err(TopologyError::DistanceCount {
                rings,
                distances: distances.len(),
            });
        }
        if let Some((ring, &distance)) = distances
            .iter()
            .enumerate()
            .find(|&(_, d)| !d.is_finite() || *d <= 0.0)
        {
            return Err(TopologyError::InvalidDistance { ring, distance });
        }

        let positions = distances.iter().flat_map(|&d| ring_positions(d)).collect();
        let adjacency = build_adjacency(rings);
        let mills = build_mills(rings);

        let mut mills_through = vec![Vec::new(); rings * RING_SIZE];
        for (mill_idx, mill) in mills.iter().enumerate() {
            for &pos in mill {
                mills_through[pos].push(mill_idx);
            }
        }

        Ok(Self {
            rings,
            positions,
            adjacency,
            mills,
            mills_through,
        })
    }

    pub fn rings(&self) -> usize {
        self.rings
    }

    pub fn len(&self) -> usize {
        self.rings * RING_SIZE
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Neighbour mask of `pos`.
    pub fn neighbors(&self, pos: usize) -> u64 {
        self.adjacency.get(pos).copied().unwrap_or(0)
    }

    pub fn mills(&self) -> &[[usize; 3]] {
        &self.mills
    }

    /// Mill triples containing `pos`.
    pub fn mills_through(&self, pos: usize) -> impl Iterator<Item = &[usize; 3]> + '_ {
        self.mills_through
            .get(pos)
            .into_iter()
            .flatten()
            .map(|&mill_idx| &self.mills[mill_idx])
    }

    /// Mask with one bit per point of this board.
    pub fn full_mask(&self) -> u64 {
        points_mask(self.len())
    }

    /// Serializable form with adjacency lists, for the UI.
    pub fn to_view(&self) -> TopologyView {
        TopologyView {
            rings: self.rings,
            positions: self.positions.clone(),
            adjacency: self
                .adjacency
                .iter()
                .map(|&mask| bits(mask).map(|p| p as u8).collect())
                .collect(),
            mills: self
                .mills
                .iter()
                .map(|m| [m[0] as u8, m[1] as u8, m[2] as u8])
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyView {
    pub rings: usize,
    pub positions: Vec<Point>,
    pub adjacency: Vec<Vec<u8>>,
    pub mills: Vec<[u8; 3]>,
}

fn ring_positions(d: f64) -> [Point; RING_SIZE] {
    let (cx, cy) = (0.5, 0.5);
    let p = |x, y| Point { x, y };
    [
        p(cx - d, cy - d),
        p(cx + d, cy - d),
        p(cx + d, cy + d),
        p(cx - d, cy + d),
        p(cx, cy - d),
        p(cx + d, cy),
        p(cx, cy + d),
        p(cx - d, cy),
    ]
}

fn build_adjacency(rings: usize) -> Vec<u64> {
    let mut adjacency = vec![0u64; rings * RING_SIZE];
    let mut connect = |a: usize, b: usize| {
        adjacency[a] |= bit(b);
        adjacency[b] |= bit(a);
    };

    for ring in 0..rings {
        let base = ring * RING_SIZE;
        for i in 0..RING_SIZE {
            connect(
                base + PERIMETER[i],
                base + PERIMETER[(i + 1) % RING_SIZE],
            );
        }
    }

    for slot in SPOKES {
        for ring in 0..rings.saturating_sub(1) {
            connect(ring * RING_SIZE + slot, (ring + 1) * RING_SIZE + slot);
        }
    }

    adjacency
}

fn build_mills(rings: usize) -> Vec<[usize; 3]> {
    let mut mills = Vec::with_capacity(4 * rings + 4 * rings.saturating_sub(2));

    for ring in 0..rings {
        let base = ring * RING_SIZE;
        for side in SIDES {
            mills.push(side.map(|slot| base + slot));
        }
    }

    for slot in SPOKES {
        for ring in 0..rings.saturating_sub(2) {
            mills.push([0, 1, 2].map(|k| (ring + k) * RING_SIZE + slot));
        }
    }

    mills
}

/// Occupancy of one board, one bitboard per color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    blue: u64,
    green: u64,
    len: u8,
}

impl Board {
    /// Empty board with `points` cells (at most 64).
    pub fn new(points: usize) -> Self {
        Self {
            blue: 0,
            green: 0,
            len: points.min(64) as u8,
        }
    }

    pub fn from_bitboards(blue: u64, green: u64, points: usize) -> Self {
        let mask = points_mask(points);
        Self {
            blue: blue & mask,
            green: green & mask & !blue,
            len: points.min(64) as u8,
        }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn get(&self, pos: usize) -> Option<Color> {
        let square = bit(pos);
        if (self.blue & square) != 0 {
            Some(Color::Blue)
        } else if (self.green & square) != 0 {
            Some(Color::Green)
        } else {
            None
        }
    }

    /// Writes `cell` at `pos`, replacing whatever was there.
    pub fn set(&mut self, pos: usize, cell: Option<Color>) {
        if pos >= self.len() {
            return;
        }
        let square = bit(pos);
        self.blue &= !square;
        self.green &= !square;
        match cell {
            Some(Color::Blue) => self.blue |= square,
            Some(Color::Green) => self.green |= square,
            None => {}
        }
    }

    /// Bitboard of `color`.
    pub fn occupied(&self, color: Color) -> u64 {
        match color {
            Color::Blue => self.blue,
            Color::Green => self.green,
        }
    }

    pub fn empty_mask(&self) -> u64 {
        points_mask(self.len()) & !(self.blue | self.green)
    }

    pub fn count(&self, color: Color) -> u8 {
        self.occupied(color).count_ones() as u8
    }

    pub fn empty_count(&self) -> u8 {
        self.empty_mask().count_ones() as u8
    }

    /// Converts the board to one byte per cell: 0=empty, 1=blue, 2=green.
    pub fn to_array(&self) -> Vec<u8> {
        (0..self.len())
            .map(|pos| self.get(pos).map_or(0, Color::cell_value))
            .collect()
    }
}

pub fn bit(pos: usize) -> u64 {
    if pos < 64 { 1u64 << pos } else { 0 }
}

fn points_mask(points: usize) -> u64 {
    if points >= 64 {
        u64::MAX
    } else {
        (1u64 << points) - 1
    }
}

/// Iterates the set bits of `mask`, lowest first.
pub fn bits(mask: u64) -> impl Iterator<Item = usize> {
    let mut rest = mask;
    std::iter::from_fn(move || {
        if rest == 0 {
            return None;
        }
        let pos = rest.trailing_zeros() as usize;
        rest &= rest - 1;
        Some(pos)
    })
}
