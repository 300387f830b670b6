//! Croupier CLI
//!
//! Drives one table from the command line: place chips by label or by click,
//! spin, and keep the session in the save file.

use clap::{Parser, Subcommand};
use croupier::{
    common::config::ConfigLoader,
    config::CroupierConfig,
    errors::CroupierResult,
    roulette::{
        layout::{AreaClick, TableLayout},
        simulation::{Simulation, SimulationScenario},
        table::{RoundReport, Table},
    },
    save_store::SaveStore,
};
use std::path::PathBuf;
use tracing::warn;

/// European roulette table
#[derive(Parser)]
#[command(name = "croupier")]
#[command(about = "Single-table European roulette betting engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed the wheel for reproducible spins
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Place bets and spin
    Play {
        /// Bet label, one chip per occurrence ("Straight 17", "Red", "Split 8-11", "17")
        #[arg(long = "bet")]
        bets: Vec<String>,

        /// Layout click AREA:COL:ROW:U:V with an optional :lane or :block
        #[arg(long = "click")]
        clicks: Vec<AreaClick>,

        /// Layout click that takes a chip back
        #[arg(long = "unclick")]
        unclicks: Vec<AreaClick>,

        /// Pin the winning number
        #[arg(long, allow_hyphen_values = true)]
        force: Option<i64>,

        /// Rounds to play with the same bets
        #[arg(long, default_value = "1")]
        rounds: usize,

        /// Save file (overrides the configured path)
        #[arg(long)]
        save: Option<PathBuf>,

        /// Start over from the starting money
        #[arg(long)]
        new_game: bool,
    },
    /// Measure return to player over many rounds
    Simulate {
        #[arg(long, default_value = "10000")]
        rounds: usize,

        #[arg(long = "bet", required = true)]
        bets: Vec<String>,

        #[arg(long, allow_hyphen_values = true)]
        force: Option<i64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the table layout
    Layout,
}

fn main() -> CroupierResult<()> {
    let cli = Cli::parse();

    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;

    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Play {
            bets,
            clicks,
            unclicks,
            force,
            rounds,
            save,
            new_game,
        } => {
            let round = RoundPlan {
                bets,
                clicks,
                unclicks,
                force,
            };
            play(config, cli.seed, round, rounds, save, new_game)
        }
        Commands::Simulate {
            rounds,
            bets,
            force,
            json,
        } => simulate(config, cli.seed, rounds, bets, force, json),
        Commands::Layout => {
            print!("{}", TableLayout::european());
            Ok(())
        }
    }
}

fn init_tracing(config: &CroupierConfig, verbose: bool) {
    if !config.monitoring.enable_logging {
        return;
    }
    let default_level = if verbose {
        "debug"
    } else {
        config.monitoring.log_level.as_directive()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("croupier={}", default_level).into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Chips to put down every round
struct RoundPlan {
    bets: Vec<String>,
    clicks: Vec<AreaClick>,
    unclicks: Vec<AreaClick>,
    force: Option<i64>,
}

fn play(
    config: CroupierConfig,
    seed: Option<u64>,
    plan: RoundPlan,
    rounds: usize,
    save: Option<PathBuf>,
    new_game: bool,
) -> CroupierResult<()> {
    let save_path = save.unwrap_or_else(|| config.session.save_path.clone());
    let store = SaveStore::new(&save_path, config.table.starting_money).with_history(config.history.clone());
    let snapshot = if new_game { store.new_game()? } else { store.load()? };
    let autosave = config.session.autosave;

    let mut table = Table::from_snapshot(config, &snapshot)?;
    if let Some(seed) = seed {
        table = table.with_seed(seed);
    }

    println!("🎰 Balance ${}, chip ${}", table.balance(), table.chip_value());

    for _ in 0..rounds {
        for label in &plan.bets {
            report_refusal(label, table.place_label(label).map(|_| ()));
        }
        for click in &plan.clicks {
            report_refusal("click", table.click(click.area, &click.click).map(|_| ()));
        }
        for click in &plan.unclicks {
            report_refusal("unclick", table.unclick(click.area, &click.click).map(|_| ()));
        }

        if table.book().is_empty() {
            println!("No bets on the table, stopping");
            break;
        }

        let mut round_lines: Vec<String> = table
            .book()
            .entries()
            .iter()
            .map(|bet| format!("Bet : {} - ${}", bet.history_label(), bet.stake()))
            .collect();

        let report = table.spin(plan.force)?;
        print_report(&report);
        round_lines.push(report.history_line.clone());

        if autosave {
            store.record_round(report.balance, report.profit, &round_lines, report.winning_number)?;
        }
    }

    if !autosave {
        store.save(&table.snapshot())?;
    }

    println!("Recent winners: {:?}", table.history().winning_numbers());
    println!("💰 Balance ${}, profit {}", table.balance(), table.profit());
    Ok(())
}

fn report_refusal(what: &str, result: Result<(), croupier::BetError>) {
    if let Err(e) = result {
        warn!("Refused {}: {}", what, e);
        println!("❌ {}: {}", what, e);
    }
}

fn print_report(report: &RoundReport) {
    println!("{}", report.history_line);
    println!(
        "   {} {} | returned ${} on ${} | net {} | balance ${}",
        report.winning_number,
        report.colour,
        report.total_return,
        report.wagered,
        report.net,
        report.balance
    );
    for payout in &report.payouts {
        println!(
            "   ✅ {} pays {}:1 on ${} -> ${}",
            payout.name, payout.payout, payout.stake, payout.amount
        );
    }
}

fn simulate(
    config: CroupierConfig,
    seed: Option<u64>,
    rounds: usize,
    bets: Vec<String>,
    forced: Option<i64>,
    json: bool,
) -> CroupierResult<()> {
    let scenario = SimulationScenario {
        rounds,
        bets,
        seed,
        forced,
    };
    let report = Simulation::new(config).run(&scenario)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📊 Simulation Results");
    println!("=====================");
    println!("Rounds played:    {} / {}", report.rounds_played, report.rounds_requested);
    println!("Rounds won:       {}", report.rounds_won);
    println!("Hit rate:         {:.2}%", report.hit_rate * 100.0);
    println!("Total wagered:    ${}", report.total_wagered);
    println!("Total returned:   ${}", report.total_returned);
    println!("Return to player: {:.2}%", report.return_to_player * 100.0);
    println!("House edge:       {:.2}%", report.house_edge * 100.0);
    println!("Final balance:    ${}", report.final_balance);
    if report.stopped_early {
        println!("Stopped early: out of money");
    }
    println!("Execution time:   {:?}", report.execution_time);
    Ok(())
}
