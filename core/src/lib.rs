#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use ball::*;
pub use board::*;
pub use error::*;
pub use lines::*;
pub use path::*;
pub use session::*;
pub use spawn::*;
pub use types::*;

mod ball;
mod board;
mod error;
mod lines;
mod path;
mod session;
mod spawn;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    /// Shortest same-colored run that clears.
    pub min_run: u8,
    /// How many upcoming colors are previewed (and spawned per turn).
    pub preview: u8,
    /// Balls scattered when a game starts.
    pub initial_spawn: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(
        size: Coord2,
        min_run: u8,
        preview: u8,
        initial_spawn: CellCount,
    ) -> Self {
        Self {
            size,
            min_run,
            preview,
            initial_spawn,
        }
    }

    pub fn new(
        (size_x, size_y): Coord2,
        min_run: u8,
        preview: u8,
        initial_spawn: CellCount,
    ) -> Self {
        let size_x = size_x.clamp(1, Coord::MAX);
        let size_y = size_y.clamp(1, Coord::MAX);
        let min_run = min_run.max(2);
        let initial_spawn = initial_spawn.clamp(0, mult(size_x, size_y));
        Self::new_unchecked((size_x, size_y), min_run, preview, initial_spawn)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for GameConfig {
    /// Classic rules: 9×9 board, runs of 5, 3-ball preview, 5 opening balls.
    fn default() -> Self {
        Self::new_unchecked((9, 9), 5, 3, 5)
    }
}
