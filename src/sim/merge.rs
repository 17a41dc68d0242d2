//! Tile-merge grid transform
//!
//! A move compacts every line toward the leading edge, merges equal neighbours
//! pairwise (each tile merges at most once per move) and re-pads with zeros.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::input::Direction;

/// Probability that a spawned tile is a 2 rather than a 4
pub const SPAWN_TWO_PROBABILITY: f32 = 0.9;

/// Slide one line toward index 0. Returns the new line and the merged score.
pub fn slide_line(line: &[u32]) -> (Vec<u32>, u32) {
    let mut out = Vec::with_capacity(line.len());
    let mut gained = 0;
    let mut tiles = line.iter().copied().filter(|&v| v != 0).peekable();

    while let Some(value) = tiles.next() {
        if tiles.peek() == Some(&value) {
            tiles.next();
            out.push(value * 2);
            gained += value * 2;
        } else {
            out.push(value);
        }
    }
    out.resize(line.len(), 0);
    (out, gained)
}

/// Outcome of a single move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub changed: bool,
    pub score: u32,
    /// Value of the tile spawned afterwards, if any
    pub spawned: Option<u32>,
}

/// Square grid of tile values, 0 = empty, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<u32>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        let size = size.max(2);
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build from rows. Returns `None` unless the rows form a square.
    pub fn from_rows(rows: &[Vec<u32>]) -> Option<Self> {
        let size = rows.len();
        if size < 2 || rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.concat(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row * self.size + col] = value;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.size)
    }

    pub fn sum(&self) -> u64 {
        self.cells.iter().map(|&v| v as u64).sum()
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == 0)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Cell coordinates of line `index`, ordered from the leading edge of `dir`
    fn line_coords(&self, dir: Direction, index: usize) -> Vec<(usize, usize)> {
        let n = self.size;
        (0..n)
            .map(|k| match dir {
                Direction::Left => (index, k),
                Direction::Right => (index, n - 1 - k),
                Direction::Up => (k, index),
                Direction::Down => (n - 1 - k, index),
            })
            .collect()
    }

    /// Apply the slide/merge transform without spawning. Returns (changed, score).
    pub fn shift(&mut self, dir: Direction) -> (bool, u32) {
        let mut changed = false;
        let mut score = 0;
        for index in 0..self.size {
            let coords = self.line_coords(dir, index);
            let line: Vec<u32> = coords.iter().map(|&(r, c)| self.get(r, c)).collect();
            let (slid, gained) = slide_line(&line);
            if slid != line {
                changed = true;
                for (&(r, c), &v) in coords.iter().zip(&slid) {
                    self.set(r, c, v);
                }
            }
            score += gained;
        }
        (changed, score)
    }

    /// Put a 2 (90%) or 4 into a uniformly random empty cell
    pub fn spawn_tile(&mut self, rng: &mut impl Rng) -> Option<u32> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let (row, col) = empty[rng.random_range(0..empty.len())];
        let value = if rng.random::<f32>() < SPAWN_TWO_PROBABILITY { 2 } else { 4 };
        self.set(row, col, value);
        Some(value)
    }

    /// Full move: shift, then spawn one tile if anything changed
    pub fn apply_move(&mut self, dir: Direction, rng: &mut impl Rng) -> MoveResult {
        let (changed, score) = self.shift(dir);
        let spawned = if changed { self.spawn_tile(rng) } else { None };
        MoveResult {
            changed,
            score,
            spawned,
        }
    }

    /// Whether any direction would change the grid
    pub fn has_moves(&self) -> bool {
        if self.cells.contains(&0) {
            return true;
        }
        let n = self.size;
        (0..n).any(|r| {
            (0..n).any(|c| {
                let v = self.get(r, c);
                (c + 1 < n && self.get(r, c + 1) == v) || (r + 1 < n && self.get(r + 1, c) == v)
            })
        })
    }
}
