use gemmines_core::*;
use serde::{Deserialize, Serialize};

/// Values submitted by the manual/auto betting form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BetSettings {
    pub bet_amount: u64,
    pub mines: CellCount,
    pub tiles_to_reveal: Option<CellCount>,
    pub is_auto_betting: bool,
}

impl Default for BetSettings {
    fn default() -> Self {
        Self {
            bet_amount: 50,
            mines: CLASSIC_MINES,
            tiles_to_reveal: Some(DEFAULT_TILES_TO_REVEAL),
            is_auto_betting: false,
        }
    }
}

impl BetSettings {
    /// Checks the form values against a board of `size` and returns the round config.
    pub fn validate(&self, size: Coord) -> Result<GameConfig> {
        if self.bet_amount == 0 {
            return Err(ConfigError::ZeroBet.into());
        }
        GameConfig::try_new(size, self.mines)
    }

    /// Places the bet on `engine`, starting a new round with a grid drawn from `seed`.
    pub fn place(&self, engine: &mut MinesEngine, size: Coord, seed: u64) -> Result<()> {
        let config = self.validate(size)?;
        engine.place_bet(config, self.bet_amount, seed)
    }

    /// Auto-reveal sequencer for the round just placed, when the form asked for auto play.
    pub fn auto_reveal(&self, engine: &MinesEngine, seed: u64) -> Option<AutoReveal> {
        if !self.is_auto_betting {
            return None;
        }
        engine
            .round()
            .filter(|round| round.is_playing())
            .map(|round| AutoReveal::new(round, self.tiles_to_reveal, seed))
    }
}

/// Extra values of the auto betting form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoBetSettings {
    pub number_of_bets: u32,
    pub on_win: BetAdjustment,
    pub on_loss: BetAdjustment,
    pub stop_on_profit: Option<u64>,
    pub stop_on_loss: Option<u64>,
}

impl Default for AutoBetSettings {
    fn default() -> Self {
        let plan = AutoBetPlan::new(1);
        Self {
            number_of_bets: plan.rounds,
            on_win: plan.on_win,
            on_loss: plan.on_loss,
            stop_on_profit: plan.stop_on_profit,
            stop_on_loss: plan.stop_on_loss,
        }
    }
}

impl AutoBetSettings {
    pub fn plan(&self, base_bet: u64) -> AutoBetPlan {
        AutoBetPlan {
            base_bet,
            rounds: self.number_of_bets,
            on_win: self.on_win,
            on_loss: self.on_loss,
            stop_on_profit: self.stop_on_profit,
            stop_on_loss: self.stop_on_loss,
        }
    }
}
