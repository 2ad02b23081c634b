use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Percent chance that the very first reveal is a mine.
pub fn first_click_mine_chance(config: GameConfig) -> f64 {
    f64::from(config.mines()) / f64::from(config.total_tiles()) * 100.0
}

/// Probability of revealing `gems` tiles in a row without hitting a mine.
pub fn survival_chance(config: GameConfig, gems: CellCount) -> f64 {
    if gems > config.safe_tiles() {
        return 0.0;
    }
    (0..gems).fold(1.0, |chance, i| {
        chance * f64::from(config.safe_tiles() - i) / f64::from(config.total_tiles() - i)
    })
}

/// Multiplier a round holds after `gems` safe reveals, honoring the reveal cap.
pub fn multiplier_after(config: GameConfig, gems: CellCount, cap: RevealCap) -> Multiplier {
    let paying = gems
        .min(cap.max_reveal(config.total_tiles(), config.mines()))
        .min(config.safe_tiles());
    (0..paying).fold(Multiplier::ONE, |current, revealed| {
        next_multiplier(config.total_tiles(), config.mines(), revealed, current)
    })
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskRow {
    pub gems: CellCount,
    pub survival: f64,
    pub multiplier: Multiplier,
}

/// Survival chance and multiplier for every reveal count a table would list.
pub fn risk_table(config: GameConfig, cap: RevealCap) -> Vec<RiskRow> {
    (1..=cap.table_len(config.total_tiles(), config.mines()))
        .map(|gems| RiskRow {
            gems,
            survival: survival_chance(config, gems),
            multiplier: multiplier_after(config, gems, cap),
        })
        .collect()
}
