use gemmines_core::*;
use serde::{Deserialize, Serialize};

/// How a tile should be drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellView {
    Hidden,
    Gem,
    Mine,
}

impl From<Cell> for CellView {
    fn from(cell: Cell) -> Self {
        match (cell.is_revealed(), cell.contents()) {
            (false, _) => Self::Hidden,
            (true, CellContents::Gem) => Self::Gem,
            (true, CellContents::Mine) => Self::Mine,
        }
    }
}

/// Everything a host needs to render the board and its stats panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    pub phase: RoundPhase,
    pub cells: Vec<Vec<CellView>>,
    pub bet_amount: u64,
    pub mines: CellCount,
    pub revealed_safe_count: CellCount,
    pub multiplier: f64,
    pub profit: u64,
    pub payout: u64,
    pub mine_chance: u8,
    pub is_playing: bool,
    pub is_game_over: bool,
    pub is_game_won: bool,
}

impl RoundView {
    /// Snapshot of `engine`; `None` before any bet is placed.
    pub fn from_engine(engine: &MinesEngine) -> Option<Self> {
        let grid = engine.grid()?;
        let round = engine.round()?;

        let cells = (0..grid.size())
            .map(|row| {
                (0..grid.size())
                    .map(|col| CellView::from(grid[(row, col)]))
                    .collect()
            })
            .collect();

        Some(Self {
            phase: round.phase(),
            cells,
            bet_amount: round.bet_amount(),
            mines: round.mine_count(),
            revealed_safe_count: round.revealed_safe_count(),
            multiplier: round.multiplier().as_f64(),
            profit: round.profit(),
            payout: round.payout(),
            mine_chance: round.mine_chance(),
            is_playing: round.is_playing(),
            is_game_over: round.is_game_over(),
            is_game_won: round.is_game_won(),
        })
    }
}
