use anyhow::{Result, bail};
use gemmines_core::*;
use gemmines_protocol::{RoundEvent, RoundView};
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use crate::config::CliConfig;
use crate::render;

#[derive(Debug, PartialEq)]
enum Input {
    Reveal(Coord2),
    Cashout,
    New,
    Reset,
    Quit,
    Help,
}

fn parse_input(line: &str) -> Result<Input> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(Input::Help);
    };
    let input = match word {
        "r" | "reveal" => {
            let (Some(row), Some(col)) = (words.next(), words.next()) else {
                bail!("usage: reveal <row> <col>");
            };
            Input::Reveal((row.parse()?, col.parse()?))
        }
        "c" | "cashout" => Input::Cashout,
        "n" | "new" => Input::New,
        "reset" => Input::Reset,
        "q" | "quit" | "exit" => Input::Quit,
        "h" | "help" | "?" => Input::Help,
        other => bail!("unknown command {:?}, try help", other),
    };
    Ok(input)
}

fn describe(event: &RoundEvent) -> String {
    match event {
        RoundEvent::BetPlaced { bet_amount, mines } => {
            format!("Bet placed: {} on {} mines", bet_amount, mines)
        }
        RoundEvent::Revealed { row, col } => format!("Gem at {} {}", row, col),
        RoundEvent::Lost { row, col } => format!("Mine at {} {}! Round lost", row, col),
        RoundEvent::WonPerfect { payout } => {
            format!("All gems found! Payout {}", payout)
        }
        RoundEvent::CashedOut { payout, multiplier } => {
            format!("Cashed out {} ({:.2}x)", payout, multiplier)
        }
    }
}

fn show(engine: &MinesEngine, out: &mut impl Write) -> Result<()> {
    if let Some(view) = RoundView::from_engine(engine) {
        write!(out, "{}", render::board(&view))?;
        writeln!(out, "{}", render::stats(&view))?;
    }
    Ok(())
}

fn place(
    config: &CliConfig,
    engine: &mut MinesEngine,
    seed: u64,
    out: &mut impl Write,
) -> Result<()> {
    engine.reset();
    config.bet.place(engine, config.size, seed)?;
    if let Some(round) = engine.round() {
        writeln!(out, "{}", describe(&RoundEvent::bet_placed(round)))?;
    }
    Ok(())
}

const HELP: &str = "commands: reveal <row> <col> | cashout | new | reset | quit";

/// Interactive rounds driven by lines of `input`.
pub fn play(
    config: &CliConfig,
    seed: u64,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let mut engine = MinesEngine::new();
    let mut round_seed = seed;
    place(config, &mut engine, round_seed, out)?;
    show(&engine, out)?;
    writeln!(out, "{}", HELP)?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_input(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{}", err)?;
                continue;
            }
        };

        let result = match command {
            Input::Reveal(coords) => engine.reveal(coords).map(|outcome| {
                engine
                    .round()
                    .map(|round| RoundEvent::from_reveal(coords, outcome, round))
            }),
            Input::Cashout => engine.cashout().map(|payout| {
                engine
                    .round()
                    .map(|round| RoundEvent::cashed_out(payout, round))
            }),
            Input::New => {
                if engine.is_playing() {
                    writeln!(out, "Finish or cash out the current round first")?;
                    continue;
                }
                round_seed = round_seed.wrapping_add(1);
                place(config, &mut engine, round_seed, out)?;
                show(&engine, out)?;
                continue;
            }
            Input::Reset => {
                engine.reset();
                writeln!(out, "Board cleared, type new to place a bet")?;
                continue;
            }
            Input::Quit => break,
            Input::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
        };

        match result {
            Ok(event) => {
                if let Some(event) = event {
                    writeln!(out, "{}", describe(&event))?;
                }
                show(&engine, out)?;
                if !engine.is_playing() {
                    writeln!(out, "Round over, type new for another")?;
                }
            }
            Err(err) => {
                log::warn!("Rejected input {:?}: {}", line, err);
                writeln!(out, "{}", err)?;
            }
        }
    }
    Ok(())
}

/// One automatically played round.
pub fn auto(
    config: &CliConfig,
    seed: u64,
    realtime: bool,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut engine = MinesEngine::new();
    let settings = gemmines_protocol::BetSettings {
        is_auto_betting: true,
        ..config.bet.clone()
    };
    settings.place(&mut engine, config.size, seed)?;
    let Some(mut sequence) = settings.auto_reveal(&engine, seed.rotate_left(32)) else {
        bail!("auto play needs a round in progress");
    };

    let emit = |event: RoundEvent, out: &mut dyn Write| -> Result<()> {
        if json {
            writeln!(out, "{}", event.to_json_line()?)?;
        } else {
            writeln!(out, "{}", describe(&event))?;
        }
        Ok(())
    };

    if let Some(round) = engine.round() {
        emit(RoundEvent::bet_placed(round), out)?;
    }
    while !sequence.is_finished() {
        let delay = sequence.next_delay_ms();
        if realtime {
            thread::sleep(Duration::from_millis(delay.into()));
        }

        let step = sequence.step(&mut engine)?;
        let Some(round) = engine.round() else {
            break;
        };
        match step {
            AutoStep::Revealed { coords, outcome } => {
                emit(RoundEvent::from_reveal(coords, outcome, round), out)?
            }
            AutoStep::CashedOut { payout } => emit(RoundEvent::cashed_out(payout, round), out)?,
            AutoStep::Stopped(reason) => log::info!("Auto play stopped: {:?}", reason),
        }
    }

    if !json {
        show(&engine, out)?;
    }
    Ok(())
}

/// A series of automatic rounds following the `[autobet]` plan.
pub fn autobet(config: &CliConfig, seed: u64, out: &mut impl Write) -> Result<()> {
    let game = config.bet.validate(config.size)?;
    let mut session = AutoBetSession::new(config.autobet.plan(config.bet.bet_amount))?;
    let mut engine = MinesEngine::new();

    let mut round_seed = seed;
    while let Some(settlement) =
        session.play_round(&mut engine, game, config.bet.tiles_to_reveal, round_seed)?
    {
        writeln!(
            out,
            "round {:>3}: bet {:>6} -> {:>6} ({:?}), net {}",
            session.rounds_played(),
            settlement.bet,
            settlement.payout,
            settlement.phase,
            session.net_profit()
        )?;
        round_seed = round_seed.wrapping_add(1);
    }

    writeln!(
        out,
        "{} wins, {} losses, net {} ({:?})",
        session.wins(),
        session.losses(),
        session.net_profit(),
        session.stop_reason()
    )?;
    Ok(())
}

pub fn table(config: &CliConfig, out: &mut impl Write) -> Result<()> {
    let game = config.bet.validate(config.size)?;
    let bet = config.bet.bet_amount;
    writeln!(out, "{} mines, bet {}", game.mines(), bet)?;
    writeln!(out, "gems  multiplier  payout")?;
    for step in multiplier_table(game.total_tiles(), game.mines(), RevealCap::CLASSIC) {
        writeln!(
            out,
            "{:>4}  {:>9}x  {:>6}",
            step.tiles,
            step.multiplier,
            step.multiplier.payout(bet)
        )?;
    }
    Ok(())
}

pub fn odds(config: &CliConfig, out: &mut impl Write) -> Result<()> {
    let game = config.bet.validate(config.size)?;
    writeln!(
        out,
        "{} mines, first click risk {:.1}%",
        game.mines(),
        first_click_mine_chance(game)
    )?;
    writeln!(out, "gems  survive  multiplier")?;
    for row in risk_table(game, RevealCap::CLASSIC) {
        writeln!(
            out,
            "{:>4}  {:>6.2}%  {:>9}x",
            row.gems,
            row.survival * 100.0,
            row.multiplier
        )?;
    }
    Ok(())
}
