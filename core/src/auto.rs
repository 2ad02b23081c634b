//! Automatic play: revealing tiles on a timer and chaining rounds with bet adjustments.
//!
//! Nothing here sleeps or spawns. The host calls [`AutoReveal::step`] from its own timer
//! callback, waiting [`AutoReveal::next_delay_ms`] between calls.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::*;

/// Tiles revealed by auto play when the bet settings leave it unset.
pub const DEFAULT_TILES_TO_REVEAL: CellCount = 5;

/// Delay before the first automatic reveal.
pub const AUTO_INITIAL_DELAY_MS: u32 = 800;

/// Range of the randomized "thinking" delay between automatic reveals.
pub const AUTO_STEP_DELAY_MS: core::ops::Range<u32> = 300..1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AutoStopReason {
    /// The round ended, either by this sequence or by the player.
    RoundEnded(RoundPhase),
    /// The engine now holds a different round than the one this sequence was made for.
    RoundReplaced,
    /// Every gem is already face up.
    NoHiddenGems,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AutoStep {
    Revealed {
        coords: Coord2,
        outcome: RevealOutcome,
    },
    CashedOut {
        payout: u64,
    },
    Stopped(AutoStopReason),
}

/// One-reveal-at-a-time auto player for the round currently held by a [`MinesEngine`].
#[derive(Clone, Debug)]
pub struct AutoReveal {
    round_id: u64,
    target: CellCount,
    revealed: CellCount,
    started: bool,
    finished: bool,
    rng: SmallRng,
}

impl AutoReveal {
    /// Prepares a sequence for `round`, clamping `tiles_to_reveal` to the round's reveal cap.
    pub fn new(round: &RoundState, tiles_to_reveal: Option<CellCount>, seed: u64) -> Self {
        let requested = tiles_to_reveal
            .filter(|&tiles| tiles > 0)
            .unwrap_or(DEFAULT_TILES_TO_REVEAL);
        let config = round.config();
        let target = round
            .cap()
            .auto_target(config.total_tiles(), config.mines(), requested);
        log::debug!("Auto reveal of {} tiles (requested {})", target, requested);

        Self {
            round_id: round.round_id(),
            target,
            revealed: 0,
            started: false,
            finished: false,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn target(&self) -> CellCount {
        self.target
    }

    pub fn revealed(&self) -> CellCount {
        self.revealed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// How long the host should wait before the next [`AutoReveal::step`].
    pub fn next_delay_ms(&mut self) -> u32 {
        if self.started {
            self.rng.random_range(AUTO_STEP_DELAY_MS)
        } else {
            self.started = true;
            AUTO_INITIAL_DELAY_MS
        }
    }

    /// Performs the next action: one reveal, the final cashout, or nothing when the round is over.
    ///
    /// Only the round this sequence was created for is ever touched.
    pub fn step(&mut self, engine: &mut MinesEngine) -> Result<AutoStep> {
        let same_round = engine
            .round()
            .is_some_and(|round| round.round_id() == self.round_id);
        if !same_round {
            self.finished = true;
            return Ok(AutoStep::Stopped(AutoStopReason::RoundReplaced));
        }
        let phase = engine.phase();
        if self.finished || !phase.is_playing() {
            self.finished = true;
            return Ok(AutoStep::Stopped(AutoStopReason::RoundEnded(phase)));
        }

        if self.revealed >= self.target {
            let payout = engine.cashout()?;
            self.finished = true;
            log::info!("Auto cashout after {} tiles: {}", self.revealed, payout);
            return Ok(AutoStep::CashedOut { payout });
        }

        let hidden: Vec<Coord2> = engine
            .grid()
            .map(|grid| grid.hidden_gem_coords().collect())
            .unwrap_or_default();
        let Some(&coords) = hidden.choose(&mut self.rng) else {
            self.finished = true;
            return Ok(AutoStep::Stopped(AutoStopReason::NoHiddenGems));
        };

        let outcome = engine.reveal(coords)?;
        self.revealed += 1;
        if outcome.is_terminal() {
            self.finished = true;
            log::info!("Auto reveal ended the round: {:?}", outcome);
        }
        Ok(AutoStep::Revealed { coords, outcome })
    }

    /// Steps until the sequence finishes, collecting every step taken.
    pub fn run_to_end(&mut self, engine: &mut MinesEngine) -> Result<Vec<AutoStep>> {
        let mut steps = Vec::new();
        while !self.finished {
            steps.push(self.step(engine)?);
        }
        Ok(steps)
    }
}

/// How the stake changes between automatic rounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BetAdjustment {
    /// Back to the base bet.
    Reset,
    /// Raise the previous bet by this many percent.
    Increase(u8),
    /// Lower the previous bet by this many percent.
    Decrease(u8),
}

impl BetAdjustment {
    /// Next stake given the previous one. Never drops below one unit.
    pub fn apply(self, previous: u64, base: u64) -> u64 {
        let percent_of = |percent: u8| {
            let delta = div_round(u128::from(previous) * u128::from(percent), 100);
            u64::try_from(delta).unwrap_or(u64::MAX)
        };
        let next = match self {
            Self::Reset => base,
            Self::Increase(percent) => previous.saturating_add(percent_of(percent)),
            Self::Decrease(percent) => previous.saturating_sub(percent_of(percent)),
        };
        next.max(1)
    }
}

impl Default for BetAdjustment {
    fn default() -> Self {
        Self::Reset
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognized bet adjustment {0:?}, expected Reset or a signed percentage like +25%")]
pub struct ParseAdjustmentError(String);

impl FromStr for BetAdjustment {
    type Err = ParseAdjustmentError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("reset") {
            return Ok(Self::Reset);
        }

        let err = || ParseAdjustmentError(s.to_string());
        let digits = trimmed.strip_suffix('%').ok_or_else(err)?;
        if let Some(percent) = digits.strip_prefix('+') {
            percent.parse().map(Self::Increase).map_err(|_| err())
        } else if let Some(percent) = digits.strip_prefix('-') {
            percent.parse().map(Self::Decrease).map_err(|_| err())
        } else {
            Err(err())
        }
    }
}

impl TryFrom<String> for BetAdjustment {
    type Error = ParseAdjustmentError;

    fn try_from(value: String) -> core::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BetAdjustment> for String {
    fn from(value: BetAdjustment) -> Self {
        value.to_string()
    }
}

impl fmt::Display for BetAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => f.write_str("Reset"),
            Self::Increase(percent) => write!(f, "+{}%", percent),
            Self::Decrease(percent) => write!(f, "-{}%", percent),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoBetPlan {
    pub base_bet: u64,
    pub rounds: u32,
    pub on_win: BetAdjustment,
    pub on_loss: BetAdjustment,
    pub stop_on_profit: Option<u64>,
    pub stop_on_loss: Option<u64>,
}

impl AutoBetPlan {
    pub fn new(base_bet: u64) -> Self {
        Self {
            base_bet,
            rounds: 10,
            on_win: BetAdjustment::Reset,
            on_loss: BetAdjustment::Increase(50),
            stop_on_profit: Some(500),
            stop_on_loss: Some(500),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AutoBetStop {
    RoundsExhausted,
    ProfitReached,
    LossLimitReached,
}

/// What a finished round paid against what it cost.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub bet: u64,
    pub payout: u64,
    pub phase: RoundPhase,
}

impl Settlement {
    pub fn from_round(round: &RoundState) -> Self {
        Self {
            bet: round.bet_amount(),
            payout: round.settled_payout(),
            phase: round.phase(),
        }
    }

    pub fn is_win(&self) -> bool {
        !matches!(self.phase, RoundPhase::Lost)
    }

    pub fn net(&self) -> i64 {
        let net = i128::from(self.payout) - i128::from(self.bet);
        net.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

/// Running tally of a series of automatic rounds.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoBetSession {
    plan: AutoBetPlan,
    next_bet: u64,
    rounds_played: u32,
    wins: u32,
    losses: u32,
    net_profit: i64,
}

impl AutoBetSession {
    pub fn new(plan: AutoBetPlan) -> Result<Self> {
        if plan.base_bet == 0 {
            return Err(ConfigError::ZeroBet.into());
        }
        Ok(Self {
            plan,
            next_bet: plan.base_bet,
            rounds_played: 0,
            wins: 0,
            losses: 0,
            net_profit: 0,
        })
    }

    pub fn plan(&self) -> &AutoBetPlan {
        &self.plan
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn net_profit(&self) -> i64 {
        self.net_profit
    }

    pub fn stop_reason(&self) -> Option<AutoBetStop> {
        if let Some(target) = self.plan.stop_on_profit {
            if self.net_profit >= i64::try_from(target).unwrap_or(i64::MAX) {
                return Some(AutoBetStop::ProfitReached);
            }
        }
        if let Some(limit) = self.plan.stop_on_loss {
            if -self.net_profit >= i64::try_from(limit).unwrap_or(i64::MAX) {
                return Some(AutoBetStop::LossLimitReached);
            }
        }
        if self.rounds_played >= self.plan.rounds {
            return Some(AutoBetStop::RoundsExhausted);
        }
        None
    }

    /// Stake for the next round, or `None` once the session has stopped.
    pub fn next_bet(&self) -> Option<u64> {
        match self.stop_reason() {
            Some(_) => None,
            None => Some(self.next_bet),
        }
    }

    pub fn record(&mut self, settlement: Settlement) {
        self.rounds_played += 1;
        self.net_profit = self.net_profit.saturating_add(settlement.net());

        let adjustment = if settlement.is_win() {
            self.wins += 1;
            self.plan.on_win
        } else {
            self.losses += 1;
            self.plan.on_loss
        };
        self.next_bet = adjustment.apply(settlement.bet, self.plan.base_bet);

        log::debug!(
            "Auto bet round {}: {:?}, net {}, next bet {}",
            self.rounds_played,
            settlement.phase,
            self.net_profit,
            self.next_bet
        );
    }

    /// Plays one whole automatic round on `engine` and records it.
    ///
    /// Returns `None` without touching the engine when the session has already stopped.
    pub fn play_round(
        &mut self,
        engine: &mut MinesEngine,
        config: GameConfig,
        tiles_to_reveal: Option<CellCount>,
        seed: u64,
    ) -> Result<Option<Settlement>> {
        let Some(bet) = self.next_bet() else {
            return Ok(None);
        };

        engine.reset();
        engine.place_bet(config, bet, seed)?;
        let round = engine
            .round()
            .ok_or(GameError::InvalidState(StateError::NotPlaying))?;
        let mut auto = AutoReveal::new(round, tiles_to_reveal, seed.rotate_left(32));
        auto.run_to_end(engine)?;

        let round = engine
            .round()
            .ok_or(GameError::InvalidState(StateError::NotPlaying))?;
        let settlement = Settlement::from_round(round);
        self.record(settlement);
        Ok(Some(settlement))
    }
}
