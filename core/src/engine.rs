use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    NotStarted,
    Playing,
    Lost,
    WonPerfect,
    CashedOut,
}

impl RoundPhase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Lost | Self::WonPerfect | Self::CashedOut)
    }
}

impl Default for RoundPhase {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Wager bookkeeping for a single round.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    round_id: u64,
    config: GameConfig,
    cap: RevealCap,
    bet_amount: u64,
    revealed_safe: CellCount,
    multiplier: Multiplier,
    profit: u64,
    phase: RoundPhase,
}

impl RoundState {
    pub fn new(config: GameConfig, bet_amount: u64, cap: RevealCap) -> Self {
        Self {
            round_id: 0,
            config,
            cap,
            bet_amount,
            revealed_safe: 0,
            multiplier: Multiplier::ONE,
            profit: 0,
            phase: RoundPhase::Playing,
        }
    }

    /// Sequence number assigned by the engine that started this round.
    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn cap(&self) -> RevealCap {
        self.cap
    }

    pub fn bet_amount(&self) -> u64 {
        self.bet_amount
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe
    }

    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    pub fn profit(&self) -> u64 {
        self.profit
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase.is_playing()
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, RoundPhase::Lost)
    }

    pub fn is_game_won(&self) -> bool {
        matches!(self.phase, RoundPhase::WonPerfect)
    }

    /// Current cashout value of the round.
    pub fn payout(&self) -> u64 {
        self.multiplier.payout(self.bet_amount)
    }

    /// What the round finally paid: nothing on a loss, the current payout otherwise.
    pub fn settled_payout(&self) -> u64 {
        match self.phase {
            RoundPhase::Lost | RoundPhase::NotStarted => 0,
            _ => self.payout(),
        }
    }

    pub fn mine_chance(&self) -> u8 {
        mine_chance(
            self.config.total_tiles(),
            self.config.mines(),
            self.revealed_safe,
        )
    }

    pub fn max_reveal(&self) -> CellCount {
        self.cap
            .max_reveal(self.config.total_tiles(), self.config.mines())
    }

    fn check_playing(&self) -> Result<()> {
        if self.phase.is_playing() {
            Ok(())
        } else {
            Err(StateError::NotPlaying.into())
        }
    }

    fn record_gem(&mut self) {
        let previous = self.revealed_safe;
        self.revealed_safe += 1;

        if self.revealed_safe <= self.max_reveal() {
            self.multiplier = next_multiplier(
                self.config.total_tiles(),
                self.config.mines(),
                previous,
                self.multiplier,
            );
            self.profit = self.multiplier.profit(self.bet_amount);
        }
    }
}

/// Result of applying one reveal to a grid and its round.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub grid: Grid,
    pub round: RoundState,
    pub outcome: RevealOutcome,
}

/// Reveals the tile at `coords`, returning the updated grid and round.
///
/// Nothing is modified when the round is not being played, the tile is already face up, or
/// `round` was set up for a board other than `grid`.
pub fn reveal_cell(grid: &Grid, round: &RoundState, coords: Coord2) -> Result<Transition> {
    if round.config != grid.config() {
        return Err(ConfigError::RoundMismatch.into());
    }
    let coords = grid.validate_coords(coords)?;
    round.check_playing()?;
    if grid[coords].is_revealed() {
        return Err(StateError::AlreadyRevealed.into());
    }

    let mut grid = grid.clone();
    let mut round = *round;
    grid.reveal(coords);

    let outcome = if grid[coords].is_mine() {
        round.phase = RoundPhase::Lost;
        grid.reveal_all();
        RevealOutcome::Lost
    } else {
        round.record_gem();
        if round.revealed_safe == grid.safe_tiles() {
            round.phase = RoundPhase::WonPerfect;
            grid.reveal_all();
            RevealOutcome::WonPerfect
        } else {
            RevealOutcome::Continue
        }
    };

    log::debug!(
        "Revealed {:?}: {:?}, {} gems at {}x",
        coords,
        outcome,
        round.revealed_safe,
        round.multiplier
    );
    Ok(Transition {
        grid,
        round,
        outcome,
    })
}

/// Ends a round early, returning the closed round and its payout.
pub fn cashout(round: &RoundState) -> Result<(RoundState, u64)> {
    if !round.phase.is_playing() {
        return Err(CashoutError::NotPlaying.into());
    }
    if round.revealed_safe == 0 {
        return Err(CashoutError::NothingRevealed.into());
    }

    let mut round = *round;
    round.phase = RoundPhase::CashedOut;
    let payout = round.payout();
    log::debug!("Cashed out {} at {}x", payout, round.multiplier);
    Ok((round, payout))
}

#[derive(Clone, Debug, PartialEq)]
struct ActiveRound {
    grid: Grid,
    round: RoundState,
}

/// Owns the grid and round of one player session and drives them through
/// `NotStarted -> Playing -> {Lost, WonPerfect, CashedOut}`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MinesEngine {
    cap: RevealCap,
    rounds_started: u64,
    active: Option<ActiveRound>,
}

impl MinesEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cap(cap: RevealCap) -> Self {
        Self {
            cap,
            rounds_started: 0,
            active: None,
        }
    }

    pub fn cap(&self) -> RevealCap {
        self.cap
    }

    pub fn phase(&self) -> RoundPhase {
        self.active
            .as_ref()
            .map_or(RoundPhase::NotStarted, |active| active.round.phase)
    }

    pub fn is_playing(&self) -> bool {
        self.phase().is_playing()
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.active.as_ref().map(|active| &active.grid)
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.active.as_ref().map(|active| &active.round)
    }

    pub fn mine_chance(&self) -> u8 {
        self.round().map_or(0, RoundState::mine_chance)
    }

    /// Starts a round on a randomly generated grid.
    pub fn place_bet(&mut self, config: GameConfig, bet_amount: u64, seed: u64) -> Result<()> {
        self.place_bet_with(config, bet_amount, RandomGridGenerator::new(seed))
    }

    pub fn place_bet_with<G: GridGenerator>(
        &mut self,
        config: GameConfig,
        bet_amount: u64,
        generator: G,
    ) -> Result<()> {
        self.check_can_start()?;
        self.start_round(generator.generate(config), bet_amount)
    }

    /// Starts a round on a prepared grid. A finished round is discarded first.
    pub fn start_round(&mut self, grid: Grid, bet_amount: u64) -> Result<()> {
        self.check_can_start()?;
        self.rounds_started += 1;
        let round = RoundState {
            round_id: self.rounds_started,
            ..RoundState::new(grid.config(), bet_amount, self.cap)
        };
        log::debug!(
            "Bet {} on {}x{} with {} mines",
            bet_amount,
            grid.size(),
            grid.size(),
            grid.mine_count()
        );
        self.active = Some(ActiveRound { grid, round });
        Ok(())
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let active = self
            .active
            .as_mut()
            .ok_or(GameError::InvalidState(StateError::NotPlaying))?;

        let Transition {
            grid,
            round,
            outcome,
        } = reveal_cell(&active.grid, &active.round, coords)?;
        active.grid = grid;
        active.round = round;
        Ok(outcome)
    }

    pub fn cashout(&mut self) -> Result<u64> {
        let active = self
            .active
            .as_mut()
            .ok_or(GameError::InvalidCashout(CashoutError::NotPlaying))?;

        let (round, payout) = cashout(&active.round)?;
        active.round = round;
        Ok(payout)
    }

    /// Discards the grid and round, returning to `NotStarted`.
    pub fn reset(&mut self) {
        if self.is_playing() {
            log::info!("Abandoning round in progress");
        }
        self.active = None;
    }

    fn check_can_start(&self) -> Result<()> {
        if self.is_playing() {
            Err(StateError::RoundInProgress.into())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(size: Coord, mines: &[Coord2], bet: u64) -> MinesEngine {
        let mut engine = MinesEngine::new();
        engine
            .start_round(Grid::from_mine_coords(size, mines).unwrap(), bet)
            .unwrap();
        engine
    }

    fn classic_mines(count: usize) -> alloc::vec::Vec<Coord2> {
        CoordIter::new(5).skip(25 - count).collect()
    }

    #[test]
    fn first_gem_pays_scenario_a() {
        let mut engine = engine_with(5, &classic_mines(5), 50);

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::Continue);

        let round = engine.round().unwrap();
        assert_eq!(round.multiplier(), Multiplier::from_hundredths(132));
        assert_eq!(round.profit(), 16);
        assert_eq!(round.revealed_safe_count(), 1);
        assert!(round.is_playing());
    }

    #[test]
    fn single_gem_board_wins_at_fixed_multiplier() {
        let mut engine = engine_with(5, &classic_mines(24), 10);

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::WonPerfect);

        let round = engine.round().unwrap();
        assert_eq!(round.multiplier(), Multiplier::SINGLE_GEM);
        assert!(round.is_game_won());
        assert!(!round.is_game_over());
        assert!(engine.grid().unwrap().is_fully_revealed());
        assert_eq!(round.settled_payout(), 250);
    }

    #[test]
    fn hitting_a_mine_loses_and_reveals_everything() {
        let mut engine = engine_with(5, &classic_mines(3), 100);
        engine.reveal((0, 0)).unwrap();

        assert_eq!(engine.reveal((4, 4)).unwrap(), RevealOutcome::Lost);
        assert_eq!(engine.phase(), RoundPhase::Lost);
        assert!(engine.round().unwrap().is_game_over());
        assert!(engine.grid().unwrap().is_fully_revealed());
        assert_eq!(engine.round().unwrap().settled_payout(), 0);
    }

    #[test]
    fn multiplier_freezes_after_fifteen_gems() {
        let mut engine = engine_with(5, &classic_mines(1), 100);
        let gems: alloc::vec::Vec<_> = CoordIter::new(5).take(17).collect();

        for &coords in &gems[..15] {
            engine.reveal(coords).unwrap();
        }
        let capped = engine.round().unwrap().multiplier();
        assert_eq!(capped, Multiplier::from_hundredths(278));

        for &coords in &gems[15..] {
            assert_eq!(engine.reveal(coords).unwrap(), RevealOutcome::Continue);
        }
        let round = engine.round().unwrap();
        assert_eq!(round.revealed_safe_count(), 17);
        assert_eq!(round.multiplier(), capped);
        assert_eq!(round.profit(), 178);
    }

    #[test]
    fn revealing_twice_is_rejected_without_change() {
        let mut engine = engine_with(5, &classic_mines(5), 50);
        engine.reveal((0, 0)).unwrap();
        let before = engine.clone();

        assert_eq!(
            engine.reveal((0, 0)),
            Err(GameError::InvalidState(StateError::AlreadyRevealed))
        );
        assert_eq!(engine, before);
    }

    #[test]
    fn reveal_outside_board_is_rejected() {
        let mut engine = engine_with(5, &classic_mines(5), 50);
        assert_eq!(engine.reveal((5, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn reveal_requires_a_round() {
        let mut engine = MinesEngine::new();
        assert_eq!(
            engine.reveal((0, 0)),
            Err(GameError::InvalidState(StateError::NotPlaying))
        );
    }

    #[test]
    fn reveal_after_loss_is_rejected() {
        let mut engine = engine_with(2, &[(0, 0)], 10);
        engine.reveal((0, 0)).unwrap();
        assert_eq!(
            engine.reveal((1, 1)),
            Err(GameError::InvalidState(StateError::NotPlaying))
        );
    }

    #[test]
    fn cashout_pays_current_multiplier() {
        let mut engine = engine_with(5, &classic_mines(5), 50);
        engine.reveal((0, 0)).unwrap();
        engine.reveal((0, 1)).unwrap();

        // 25 / 18
        assert_eq!(engine.cashout().unwrap(), 70);
        assert_eq!(engine.phase(), RoundPhase::CashedOut);
        assert!(!engine.round().unwrap().is_game_won());
        assert_eq!(
            engine.reveal((0, 2)),
            Err(GameError::InvalidState(StateError::NotPlaying))
        );
    }

    #[test]
    fn cashout_needs_a_revealed_gem() {
        let mut engine = engine_with(5, &classic_mines(5), 50);
        assert_eq!(
            engine.cashout(),
            Err(GameError::InvalidCashout(CashoutError::NothingRevealed))
        );

        engine.reveal((4, 4)).unwrap();
        assert_eq!(
            engine.cashout(),
            Err(GameError::InvalidCashout(CashoutError::NotPlaying))
        );
    }

    #[test]
    fn new_bet_waits_for_round_to_end() {
        let mut engine = engine_with(5, &classic_mines(5), 50);
        assert_eq!(
            engine.place_bet(GameConfig::classic(3), 10, 1),
            Err(GameError::InvalidState(StateError::RoundInProgress))
        );

        engine.reveal((0, 0)).unwrap();
        engine.cashout().unwrap();
        engine.place_bet(GameConfig::classic(3), 10, 1).unwrap();
        assert_eq!(engine.phase(), RoundPhase::Playing);
        assert_eq!(engine.round().unwrap().mine_count(), 3);
        assert_eq!(engine.grid().unwrap().revealed_count(), 0);
    }

    #[test]
    fn reset_returns_to_not_started() {
        let mut engine = engine_with(5, &classic_mines(5), 50);
        engine.reset();
        assert_eq!(engine.phase(), RoundPhase::NotStarted);
        assert!(engine.grid().is_none());
        assert_eq!(engine.mine_chance(), 0);
    }

    #[test]
    fn reveal_rejects_round_built_for_another_board() {
        let grid = Grid::from_mine_coords(5, &[(4, 4)]).unwrap();
        let round = RoundState::new(GameConfig::classic(24), 100, RevealCap::CLASSIC);

        assert_eq!(
            reveal_cell(&grid, &round, (0, 0)),
            Err(GameError::InvalidConfiguration(ConfigError::RoundMismatch))
        );

        let other_size = Grid::from_mine_coords(4, &[(3, 3)]).unwrap();
        let round = RoundState::new(GameConfig::classic(1), 100, RevealCap::CLASSIC);
        assert_eq!(
            reveal_cell(&other_size, &round, (0, 0)),
            Err(GameError::InvalidConfiguration(ConfigError::RoundMismatch))
        );
    }

    #[test]
    fn each_round_gets_a_new_id() {
        let mut engine = engine_with(5, &classic_mines(5), 50);
        let first = engine.round().unwrap().round_id();
        engine.reveal((0, 0)).unwrap();
        engine.cashout().unwrap();

        engine.place_bet(GameConfig::classic(5), 50, 4).unwrap();
        assert_ne!(engine.round().unwrap().round_id(), first);
    }

    #[test]
    fn pure_transition_leaves_inputs_untouched() {
        let grid = Grid::from_mine_coords(3, &[(2, 2)]).unwrap();
        let round = RoundState::new(grid.config(), 20, RevealCap::CLASSIC);

        let transition = reveal_cell(&grid, &round, (0, 0)).unwrap();

        assert_eq!(grid.revealed_count(), 0);
        assert_eq!(round.revealed_safe_count(), 0);
        assert_eq!(transition.grid.revealed_count(), 1);
        assert_eq!(transition.round.revealed_safe_count(), 1);
    }
}
