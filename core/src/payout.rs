use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Payout factor stored in hundredths, so `Multiplier::from_hundredths(132)` is `1.32x`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ONE: Self = Self(100);

    /// Fixed value paid for the only gem on a board with a single safe tile.
    pub const SINGLE_GEM: Self = Self(2500);

    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub const fn hundredths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// `numerator / denominator` rounded to two decimals.
    fn ratio(numerator: u32, denominator: u32) -> Self {
        let hundredths = div_round(u128::from(numerator) * 100, u128::from(denominator));
        Self(hundredths.try_into().unwrap_or(u32::MAX))
    }

    /// What a cashout at this multiplier pays for `bet`, rounded to a whole unit.
    pub fn payout(self, bet: u64) -> u64 {
        let payout = div_round(u128::from(bet) * u128::from(self.0), 100);
        payout.try_into().unwrap_or(u64::MAX)
    }

    /// Winnings on top of the stake, rounded to a whole unit.
    pub fn profit(self, bet: u64) -> u64 {
        let gain = self.0.saturating_sub(Self::ONE.0);
        let profit = div_round(u128::from(bet) * u128::from(gain), 100);
        profit.try_into().unwrap_or(u64::MAX)
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&alloc::format!("{}.{:02}", self.0 / 100, self.0 % 100))
    }
}

/// Multiplier reached by revealing one more gem after `revealed_safe` gems.
///
/// Returns `current` once the formula's denominator is no longer positive.
pub fn next_multiplier(
    total_tiles: CellCount,
    mine_count: CellCount,
    revealed_safe: CellCount,
    current: Multiplier,
) -> Multiplier {
    let next_revealed = i32::from(revealed_safe) + 1;
    let safe_tiles = i32::from(total_tiles) - i32::from(mine_count);

    if safe_tiles == 1 && next_revealed == 1 {
        return Multiplier::SINGLE_GEM;
    }

    let denominator = safe_tiles - next_revealed;
    if denominator <= 0 {
        return current;
    }

    Multiplier::ratio(u32::from(total_tiles), denominator.unsigned_abs())
}

/// Chance in whole percent that the next reveal hits a mine.
pub fn mine_chance(total_tiles: CellCount, mine_count: CellCount, revealed: CellCount) -> u8 {
    let safe_tiles = i32::from(total_tiles) - i32::from(mine_count);

    if revealed >= total_tiles || mine_count == 0 {
        return 0;
    }
    if i32::from(revealed) >= safe_tiles || safe_tiles <= 0 {
        return 100;
    }

    let unrevealed = total_tiles - revealed;
    if unrevealed == 0 {
        return 0;
    }

    let chance = div_round(u128::from(mine_count) * 100, u128::from(unrevealed));
    chance.try_into().unwrap_or(100)
}

/// How many gems may still raise the multiplier.
///
/// High-risk boards (`mines >= high_risk_threshold`) pay out on every gem; all other boards stop
/// growing after `standard_cap` gems even when more remain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealCap {
    pub high_risk_threshold: CellCount,
    pub standard_cap: CellCount,
}

impl RevealCap {
    pub const CLASSIC: Self = Self {
        high_risk_threshold: 20,
        standard_cap: 15,
    };

    pub const fn is_high_risk(&self, mine_count: CellCount) -> bool {
        mine_count >= self.high_risk_threshold
    }

    pub const fn max_reveal(&self, total_tiles: CellCount, mine_count: CellCount) -> CellCount {
        if self.is_high_risk(mine_count) {
            total_tiles.saturating_sub(mine_count)
        } else {
            self.standard_cap
        }
    }

    /// Rows worth listing in a multiplier table.
    pub fn table_len(&self, total_tiles: CellCount, mine_count: CellCount) -> CellCount {
        let safe_tiles = total_tiles.saturating_sub(mine_count);
        self.max_reveal(total_tiles, mine_count).min(safe_tiles)
    }

    /// How many tiles an auto-reveal sequence may open when asked for `requested`.
    pub fn auto_target(
        &self,
        total_tiles: CellCount,
        mine_count: CellCount,
        requested: CellCount,
    ) -> CellCount {
        requested.min(self.max_reveal(total_tiles, mine_count))
    }
}

impl Default for RevealCap {
    fn default() -> Self {
        Self::CLASSIC
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierStep {
    pub tiles: CellCount,
    pub multiplier: Multiplier,
}

/// Multiplier after each gem, as shown next to the board before a bet is placed.
pub fn multiplier_table(
    total_tiles: CellCount,
    mine_count: CellCount,
    cap: RevealCap,
) -> Vec<MultiplierStep> {
    let safe_tiles = total_tiles.saturating_sub(mine_count);

    if safe_tiles <= 1 {
        let multiplier = if safe_tiles == 1 {
            next_multiplier(total_tiles, mine_count, 0, Multiplier::ONE)
        } else {
            Multiplier::ONE
        };
        return alloc::vec![MultiplierStep {
            tiles: 1,
            multiplier
        }];
    }

    let mut table = Vec::new();
    let mut current = Multiplier::ONE;
    for tiles in 1..=cap.table_len(total_tiles, mine_count) {
        let denominator = i32::from(total_tiles) - i32::from(mine_count) - i32::from(tiles);
        if denominator <= 0 {
            break;
        }
        current = next_multiplier(total_tiles, mine_count, tiles - 1, current);
        table.push(MultiplierStep {
            tiles,
            multiplier: current,
        });
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn first_gem_with_five_mines() {
        let multiplier = next_multiplier(25, 5, 0, Multiplier::ONE);
        assert_eq!(multiplier, Multiplier::from_hundredths(132));
        assert_eq!(multiplier.profit(50), 16);
        assert_eq!(multiplier.payout(50), 66);
    }

    #[test]
    fn single_safe_tile_uses_fixed_multiplier() {
        assert_eq!(next_multiplier(25, 24, 0, Multiplier::ONE), Multiplier::SINGLE_GEM);
    }

    #[test]
    fn non_positive_denominator_keeps_current() {
        let current = Multiplier::from_hundredths(2500);
        // 25 - 20 - 5 == 0
        assert_eq!(next_multiplier(25, 20, 4, current), current);
        assert_eq!(next_multiplier(25, 20, 3, Multiplier::ONE), Multiplier::from_hundredths(2500));
    }

    #[test]
    fn multiplier_rounds_half_up() {
        // 25 / 8 == 3.125
        assert_eq!(next_multiplier(25, 1, 15, Multiplier::ONE).to_string(), "3.13");
        assert_eq!(next_multiplier(25, 1, 0, Multiplier::ONE).to_string(), "1.09");
    }

    #[test]
    fn mine_chance_edges() {
        assert_eq!(mine_chance(25, 5, 25), 0);
        assert_eq!(mine_chance(25, 5, 20), 100);
        assert_eq!(mine_chance(25, 0, 3), 0);
        assert_eq!(mine_chance(25, 5, 0), 20);
        assert_eq!(mine_chance(25, 5, 3), 23);
    }

    #[test]
    fn reveal_cap_is_asymmetric() {
        let cap = RevealCap::CLASSIC;
        assert_eq!(cap.max_reveal(25, 1), 15);
        assert_eq!(cap.max_reveal(25, 19), 15);
        assert_eq!(cap.max_reveal(25, 20), 5);
        assert_eq!(cap.max_reveal(25, 24), 1);
        assert_eq!(cap.table_len(25, 19), 6);
        assert_eq!(cap.auto_target(25, 3, 40), 15);
        assert_eq!(cap.auto_target(25, 22, 12), 3);
    }

    #[test]
    fn table_for_common_boards() {
        let table = multiplier_table(25, 5, RevealCap::CLASSIC);
        assert_eq!(table.len(), 15);
        assert_eq!(table[0].multiplier, Multiplier::from_hundredths(132));
        assert_eq!(table[14].tiles, 15);
        assert_eq!(table[14].multiplier, Multiplier::from_hundredths(500));
        assert!(table.windows(2).all(|w| w[0].multiplier <= w[1].multiplier));
    }

    #[test]
    fn table_stops_at_non_positive_denominator() {
        // 3 safe tiles: denominators 2, 1, then 0
        let table = multiplier_table(25, 22, RevealCap::CLASSIC);
        assert_eq!(table.len(), 2);
        assert_eq!(table[1].multiplier, Multiplier::from_hundredths(2500));
    }

    #[test]
    fn table_for_single_safe_tile() {
        let table = multiplier_table(25, 24, RevealCap::CLASSIC);
        assert_eq!(
            table,
            [MultiplierStep {
                tiles: 1,
                multiplier: Multiplier::SINGLE_GEM
            }]
        );
    }
}
