use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size grid of ball colors. Pure storage: no rules, no randomness.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Option<BallColor>>,
}

impl Board {
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Color at `coords`, or `None` for an empty cell. Out-of-range
    /// coordinates are rejected, never silently clamped.
    pub fn get(&self, coords: Coord2) -> Result<Option<BallColor>> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    pub fn set(&mut self, coords: Coord2, cell: Option<BallColor>) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.cells[coords.to_nd_index()] = cell;
        Ok(())
    }

    /// True when `coords` is in range and holds no ball.
    pub fn is_empty_at(&self, coords: Coord2) -> bool {
        matches!(self.get(coords), Ok(None))
    }

    /// Every currently-empty cell, in row-major order.
    pub fn empty_cells(&self) -> Vec<Coord2> {
        let (cols, rows) = self.size();
        let mut empty = Vec::new();
        for y in 0..rows {
            for x in 0..cols {
                if self.cells[(x, y).to_nd_index()].is_none() {
                    empty.push((x, y));
                }
            }
        }
        empty
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Empties every cell.
    pub fn reset(&mut self) {
        self.cells.fill(None);
    }

    pub(crate) fn side_neighbors(&self, coords: Coord2) -> SideNeighborIter {
        SideNeighborIter::new(coords, self.size())
    }
}

impl Index<Coord2> for Board {
    type Output = Option<BallColor>;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.cells[(x as usize, y as usize)]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, (x, y): Coord2) -> &mut Self::Output {
        &mut self.cells[(x as usize, y as usize)]
    }
}
