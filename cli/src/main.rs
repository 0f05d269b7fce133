//! Horse race CLI - headless driver for the race engine

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use horse_race_core::{
    NoopObserver, RaceConfig, RaceEngine, RaceFrame, RaceObserver, RaceOutcome, RaceResult,
    SessionSnapshot,
};

#[derive(Parser)]
#[command(name = "horse-race")]
#[command(author, version, about = "Seeded horse race simulator", long_about = None)]
struct Cli {
    /// JSON config file (flags below override its values)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Track length (25-100)
    #[arg(long)]
    track_length: Option<u32>,

    /// Number of lanes (2-8)
    #[arg(long)]
    lanes: Option<usize>,

    /// Random horses to add before the first race
    #[arg(long, default_value = "2")]
    horses: usize,

    /// Number of races to run
    #[arg(long, default_value = "1")]
    races: usize,

    /// Stake to place before every race
    #[arg(long)]
    bet: Option<f64>,

    /// Lane of the horse to back (defaults to lane 1)
    #[arg(long, default_value = "1")]
    bet_on: usize,

    /// Draw new weather before every race
    #[arg(long)]
    weather: bool,

    /// Print the track after every tick
    #[arg(long)]
    show_track: bool,

    /// Resume from a session snapshot
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Write a session snapshot after the last race
    #[arg(long)]
    save: Option<PathBuf>,
}

/// Prints each frame as one text row per lane
struct TrackPrinter;

impl RaceObserver for TrackPrinter {
    fn on_tick(&mut self, frame: &RaceFrame) {
        println!("race {} tick {} ({})", frame.race, frame.tick, frame.weather);
        for (index, slot) in frame.lanes.iter().enumerate() {
            let row = match slot {
                Some(lane) => {
                    let glyph = if lane.fallen { 'X' } else { lane.symbol };
                    let before = " ".repeat(lane.distance as usize);
                    let after = " ".repeat((frame.track_length - lane.distance) as usize);
                    format!(
                        "|{}{}{}| {} ({:.2})",
                        before, glyph, after, lane.name, lane.confidence
                    )
                }
                None => format!("|{}|", " ".repeat(frame.track_length as usize + 1)),
            };
            println!("{:>2} {}", index + 1, row);
        }
    }
}

fn load_config(cli: &Cli) -> Result<RaceConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            RaceConfig::from_json_str(&json)?
        }
        None => RaceConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }
    if let Some(track_length) = cli.track_length {
        config.track_length = track_length;
    }
    if let Some(lanes) = cli.lanes {
        config.lane_count = lanes;
    }
    config.validate()?;
    Ok(config)
}

fn build_engine(cli: &Cli, config: RaceConfig) -> Result<RaceEngine> {
    if let Some(path) = &cli.resume {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        let snapshot = SessionSnapshot::from_json(&json)?;
        return Ok(RaceEngine::restore(config, snapshot)?);
    }

    let mut engine = RaceEngine::new(config)?;
    let added = engine.add_random_horses(cli.horses)?;
    if added < cli.horses {
        warn!(requested = cli.horses, added, "not enough empty lanes for every horse");
    }
    Ok(engine)
}

fn place_bet(engine: &mut RaceEngine, stake: f64, lane: usize) -> Result<()> {
    let name = match engine.roster().get(lane) {
        Some(horse) => horse.name().to_string(),
        None => bail!("no horse in lane {} to back", lane),
    };

    engine.place_bet(stake)?;
    for projection in engine.projected_payouts()? {
        println!(
            "  lane {} {:<20} pays {:.2}",
            projection.lane, projection.name, projection.payout
        );
    }
    let payout = engine.select_horse(&name)?;
    println!("Backed {} for {:.2} (pays {:.2})", name, stake, payout);
    Ok(())
}

/// Stake to place this race, or `None` once the balance can no longer cover it
fn affordable_stake(requested: Option<f64>, balance: f64) -> Option<f64> {
    let stake = requested?;
    if stake > balance {
        warn!(stake, balance, "balance too low, racing without a bet");
        return None;
    }
    Some(stake)
}

fn print_outcome(outcome: &RaceOutcome, balance: f64) {
    match &outcome.result {
        RaceResult::Won { lane, name } => println!(
            "Race {}: {} (lane {}) won after {} ticks",
            outcome.race_number, name, lane, outcome.ticks
        ),
        RaceResult::AllFallen => println!(
            "Race {}: every horse fell after {} ticks",
            outcome.race_number, outcome.ticks
        ),
        RaceResult::Stalled => println!(
            "Race {}: stalled after {} ticks, no horse can move",
            outcome.race_number, outcome.ticks
        ),
    }

    for standing in &outcome.standings {
        println!(
            "  {}. lane {} {:<20} {}{}",
            standing.position,
            standing.lane,
            standing.name,
            standing.distance,
            if standing.fallen { " (fell)" } else { "" }
        );
    }

    if let Some(settlement) = &outcome.settlement {
        let verdict = if settlement.won { "won" } else { "lost" };
        println!(
            "Bet {}: paid {:.2}, balance {:.2}",
            verdict, settlement.payout, balance
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!(
        seed = config.rng_seed,
        track_length = config.track_length,
        lanes = config.lane_count,
        "session configured"
    );

    let mut engine = build_engine(&cli, config)?;

    for _ in 0..cli.races {
        if cli.weather {
            engine.cycle_weather()?;
        }
        if let Some(stake) = affordable_stake(cli.bet, engine.ledger().balance()) {
            place_bet(&mut engine, stake, cli.bet_on)?;
        }

        let outcome = if cli.show_track {
            engine.run_race(&mut TrackPrinter)?
        } else {
            engine.run_race(&mut NoopObserver)?
        };
        print_outcome(&outcome, engine.ledger().balance());
    }

    println!("Final balance: {:.2}", engine.ledger().balance());
    for horse in engine.roster().horses() {
        println!(
            "  {:<20} {} wins / {} races, confidence {:.2}",
            horse.name(),
            horse.total_wins(),
            horse.total_races(),
            horse.confidence()
        );
    }

    if let Some(path) = &cli.save {
        let json = engine.snapshot()?.to_json()?;
        fs::write(path, json).with_context(|| format!("writing snapshot {}", path.display()))?;
        info!(path = %path.display(), "snapshot saved");
    }

    Ok(())
}
