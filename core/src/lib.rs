#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use auto::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use odds::*;
pub use payout::*;
pub use tile::*;
pub use types::*;

mod auto;
mod engine;
mod error;
mod generator;
mod grid;
mod odds;
mod payout;
mod tile;
mod types;

/// Board edge used by the classic 5x5 game.
pub const CLASSIC_SIZE: Coord = 5;

/// Mine count preselected by the betting form.
pub const CLASSIC_MINES: CellCount = 5;

/// Square board dimensions and mine count for one round.
///
/// A config always leaves at least one safe tile and carries at least one mine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    size: Coord,
    mines: CellCount,
}

impl GameConfig {
    /// Builds a config, coercing out-of-range values into the playable range.
    pub fn new(size: Coord, mines: CellCount) -> Self {
        let size = size.max(2);
        let total = mult(size, size);
        let clamped = mines.clamp(1, total - 1);
        if clamped != mines {
            log::warn!(
                "Mine count clamped, requested {} but a {}x{} board takes {}",
                mines,
                size,
                size,
                clamped
            );
        }
        Self {
            size,
            mines: clamped,
        }
    }

    /// Builds a config, rejecting anything [`GameConfig::new`] would have to coerce.
    pub fn try_new(size: Coord, mines: CellCount) -> Result<Self> {
        if size < 2 {
            return Err(ConfigError::BoardTooSmall.into());
        }
        if mines == 0 {
            return Err(ConfigError::NoMines.into());
        }
        if mines >= mult(size, size) {
            return Err(ConfigError::TooManyMines.into());
        }
        Ok(Self { size, mines })
    }

    pub fn classic(mines: CellCount) -> Self {
        Self::new(CLASSIC_SIZE, mines)
    }

    pub const fn size(&self) -> Coord {
        self.size
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn safe_tiles(&self) -> CellCount {
        self.total_tiles() - self.mines
    }

    pub const fn max_mines(&self) -> CellCount {
        self.total_tiles() - 1
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic(CLASSIC_MINES)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// A gem was found and the round goes on.
    Continue,
    /// A mine was hit; the board is fully revealed.
    Lost,
    /// The last gem was found; the board is fully revealed.
    WonPerfect,
}

impl RevealOutcome {
    pub const fn is_terminal(self) -> bool {
        match self {
            Self::Continue => false,
            Self::Lost | Self::WonPerfect => true,
        }
    }
}
