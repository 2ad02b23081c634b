use serde::{Deserialize, Serialize};

/// What sits under a tile, fixed when the grid is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContents {
    Gem,
    Mine,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    contents: CellContents,
    revealed: bool,
}

impl Cell {
    pub const fn hidden(contents: CellContents) -> Self {
        Self {
            contents,
            revealed: false,
        }
    }

    pub const fn contents(self) -> CellContents {
        self.contents
    }

    pub const fn is_mine(self) -> bool {
        matches!(self.contents, CellContents::Mine)
    }

    pub const fn is_safe(self) -> bool {
        matches!(self.contents, CellContents::Gem)
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::hidden(CellContents::Gem)
    }
}
