//! Messages exchanged between a Mines host (betting form, board view) and the engine.

use gemmines_core::*;
use serde::{Deserialize, Serialize};

pub use settings::*;
pub use view::*;

mod settings;
mod view;

/// Notification raised after an engine action, for the host's sounds and toasts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RoundEvent {
    BetPlaced { bet_amount: u64, mines: CellCount },
    Revealed { row: Coord, col: Coord },
    Lost { row: Coord, col: Coord },
    WonPerfect { payout: u64 },
    CashedOut { payout: u64, multiplier: f64 },
}

impl RoundEvent {
    pub fn bet_placed(round: &RoundState) -> Self {
        Self::BetPlaced {
            bet_amount: round.bet_amount(),
            mines: round.mine_count(),
        }
    }

    /// Event for a reveal that `round` (the state after the reveal) went through.
    pub fn from_reveal(coords: Coord2, outcome: RevealOutcome, round: &RoundState) -> Self {
        let (row, col) = coords;
        match outcome {
            RevealOutcome::Continue => Self::Revealed { row, col },
            RevealOutcome::Lost => Self::Lost { row, col },
            RevealOutcome::WonPerfect => Self::WonPerfect {
                payout: round.settled_payout(),
            },
        }
    }

    pub fn cashed_out(payout: u64, round: &RoundState) -> Self {
        Self::CashedOut {
            payout,
            multiplier: round.multiplier().as_f64(),
        }
    }

    /// Single-line JSON form, as streamed to hosts that consume events over a pipe.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Lost { .. } | Self::WonPerfect { .. } | Self::CashedOut { .. }
        )
    }
}
