use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Square board of hidden gems and mines.
///
/// Mine positions never change after construction, only the revealed flags do.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

/// Unchecked wire form of a [`Grid`].
#[derive(Deserialize)]
struct GridData {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl TryFrom<GridData> for Grid {
    type Error = GameError;

    fn try_from(data: GridData) -> Result<Self> {
        let (rows, cols) = data.cells.dim();
        if rows != cols || Coord::try_from(rows).is_err() {
            return Err(ConfigError::InvalidBoardShape.into());
        }
        if rows < 2 {
            return Err(ConfigError::BoardTooSmall.into());
        }

        let grid = Self::from_mine_mask(&data.cells.map(|cell| cell.is_mine()));
        if grid.mine_count != data.mine_count {
            return Err(ConfigError::InvalidBoardShape.into());
        }
        Self {
            cells: data.cells,
            ..grid
        }
        .validate()
    }
}

impl Grid {
    /// Builds a grid from a mine mask whose invariants the caller already upholds.
    pub(crate) fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let cells = mine_mask.map(|&is_mine| {
            Cell::hidden(if is_mine {
                CellContents::Mine
            } else {
                CellContents::Gem
            })
        });
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self { cells, mine_count }
    }

    /// Builds a grid with mines at exactly the given coordinates.
    ///
    /// Duplicate coordinates count once. The result must hold at least one mine and one gem.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        if size < 2 {
            return Err(ConfigError::BoardTooSmall.into());
        }

        let mut mine_mask: Array2<bool> = Array2::default((size, size).to_nd_index());
        for &coords in mine_coords {
            if coords.0 >= size || coords.1 >= size {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(&mine_mask).validate()
    }

    /// Requires at least one mine and one gem.
    fn validate(self) -> Result<Self> {
        match self.mine_count {
            0 => Err(ConfigError::NoMines.into()),
            count if count >= self.total_tiles() => Err(ConfigError::TooManyMines.into()),
            _ => Ok(self),
        }
    }

    pub fn size(&self) -> Coord {
        self.cells.dim().0.try_into().unwrap_or(Coord::MAX)
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new(self.size(), self.mine_count)
    }

    pub fn total_tiles(&self) -> CellCount {
        mult(self.size(), self.size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_tiles(&self) -> CellCount {
        self.total_tiles() - self.mine_count
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn iter_coords(&self) -> CoordIter {
        CoordIter::new(self.size())
    }

    /// Coordinates of every tile that is still face down.
    pub fn hidden_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_coords().filter(|&coords| !self[coords].is_revealed())
    }

    /// Face-down tiles that hold a gem.
    pub fn hidden_gem_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.hidden_coords().filter(|&coords| self[coords].is_safe())
    }

    pub fn revealed_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_revealed())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_revealed())
    }

    pub(crate) fn reveal(&mut self, coords: Coord2) {
        self.cells[coords.to_nd_index()].reveal();
    }

    pub(crate) fn reveal_all(&mut self) {
        self.cells.iter_mut().for_each(Cell::reveal);
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
