use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::io;
use std::path::PathBuf;

mod commands;
mod config;
mod render;

use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "gemmines", version, about = "Mines on a 5x5 board, in the terminal")]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// TOML file with `[bet]` and `[autobet]` tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for mine placement and automatic picks, random when omitted
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Default)]
struct BetArgs {
    /// Stake per round
    #[arg(long)]
    bet: Option<u64>,

    /// Mines hidden on the board (1-24)
    #[arg(long)]
    mines: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play rounds interactively
    Play(BetArgs),
    /// Let the auto player reveal tiles and cash out
    Auto {
        #[command(flatten)]
        bet: BetArgs,
        /// Tiles to reveal before cashing out
        #[arg(long)]
        tiles: Option<u16>,
        /// Wait between reveals like the board animation does
        #[arg(long)]
        realtime: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Run a series of automatic rounds with bet adjustments
    Autobet {
        #[command(flatten)]
        bet: BetArgs,
        /// Tiles to reveal each round
        #[arg(long)]
        tiles: Option<u16>,
        /// Number of rounds to play
        #[arg(long)]
        rounds: Option<u32>,
    },
    /// Print the multiplier for each revealed gem
    Table {
        #[arg(long)]
        mines: Option<u16>,
    },
    /// Print survival odds for each revealed gem
    Odds {
        #[arg(long)]
        mines: Option<u16>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    log::debug!("Using seed {}", seed);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Play(bet) => {
            config.apply_overrides(bet.bet, bet.mines, None, None);
            commands::play(&config, seed, io::stdin().lock(), &mut out)
        }
        Command::Auto {
            bet,
            tiles,
            realtime,
            json,
        } => {
            config.apply_overrides(bet.bet, bet.mines, tiles, None);
            commands::auto(&config, seed, realtime, json, &mut out)
        }
        Command::Autobet { bet, tiles, rounds } => {
            config.apply_overrides(bet.bet, bet.mines, tiles, rounds);
            commands::autobet(&config, seed, &mut out)
        }
        Command::Table { mines } => {
            config.apply_overrides(None, mines, None, None);
            commands::table(&config, &mut out)
        }
        Command::Odds { mines } => {
            config.apply_overrides(None, mines, None, None);
            commands::odds(&config, &mut out)
        }
    }
}
