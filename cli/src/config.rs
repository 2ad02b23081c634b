use anyhow::{Context, Result};
use gemmines_core::{CLASSIC_SIZE, Coord};
use gemmines_protocol::{AutoBetSettings, BetSettings};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Contents of the optional `--config` file. Keys follow the betting form, e.g.:
///
/// ```toml
/// [bet]
/// betAmount = 100
/// mines = 3
///
/// [autobet]
/// numberOfBets = 20
/// onLoss = "+25%"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub size: Coord,
    pub bet: BetSettings,
    pub autobet: AutoBetSettings,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            size: CLASSIC_SIZE,
            bet: BetSettings::default(),
            autobet: AutoBetSettings::default(),
        }
    }
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Command-line flags win over the file.
    pub fn apply_overrides(
        &mut self,
        bet: Option<u64>,
        mines: Option<u16>,
        tiles: Option<u16>,
        rounds: Option<u32>,
    ) {
        if let Some(bet) = bet {
            self.bet.bet_amount = bet;
        }
        if let Some(mines) = mines {
            self.bet.mines = mines;
        }
        if let Some(tiles) = tiles {
            self.bet.tiles_to_reveal = Some(tiles);
        }
        if let Some(rounds) = rounds {
            self.autobet.number_of_bets = rounds;
        }
    }
}
