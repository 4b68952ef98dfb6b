use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use mexican_train::config::{ConfigError, GameConfig};
use mexican_train::logging::setup_logging;
use mexican_train::rng::GameRng;
use mexican_train::simulation::{collect_records, run_game, simulate_games, PlayRecord};
use mexican_train::strategy::StrategyKind;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mexican-train")]
#[command(about = "Mexican Train dominoes simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Number of players (2-8)
    #[arg(short, long, global = true)]
    players: Option<usize>,

    /// Highest pip value in the set (12 for double-twelve)
    #[arg(short, long, global = true)]
    domino_size: Option<i32>,

    /// Strategy per seat, comma separated: Greedy, Random, Probability, Learned
    #[arg(long, global = true, value_delimiter = ',')]
    strategies: Vec<StrategyKind>,

    /// JSON model file for Learned players
    #[arg(short, long, global = true)]
    model: Option<PathBuf>,

    /// JSON game config; flags override its fields
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for random number generator (for reproducibility)
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game and print every round (default)
    Play,

    /// Play a batch of games and compare strategies
    Simulate {
        /// Number of games to simulate
        #[arg(short = 'g', long, default_value = "1000")]
        num_games: usize,
    },

    /// Record labelled plays from games with random line-ups
    Collect {
        /// Number of games to record
        #[arg(short = 'g', long, default_value = "100")]
        num_games: usize,

        /// Output file, JSON lines (default: records_<timestamp>.jsonl)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let _logger = match setup_logging(cli.verbose) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("✗ Failed to start logging: {}", e);
            None
        }
    };

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };
    let seed = cli.seed.unwrap_or_else(|| GameRng::new(None).seed());

    match cli.command {
        Some(Commands::Play) | None => play_game(&config, seed),
        Some(Commands::Simulate { num_games }) => run_simulation(&config, num_games, seed),
        Some(Commands::Collect { num_games, output }) => {
            run_collection(&config, num_games, seed, output.as_deref())
        }
    }
}

/// Config file (or defaults) with command-line overrides applied
fn build_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };

    if let Some(players) = cli.players {
        config.num_players = players;
        if cli.strategies.is_empty() && config.strategies.len() != players {
            // first seat greedy, everyone else random
            config.strategies = (0..players)
                .map(|seat| if seat == 0 { StrategyKind::Greedy } else { StrategyKind::Random })
                .collect();
        }
    }
    if let Some(size) = cli.domino_size {
        config.domino_size = size;
    }
    if !cli.strategies.is_empty() {
        config.strategies = cli.strategies.clone();
    }
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }

    config.validate()?;
    Ok(config)
}

fn print_header(title: &str, config: &GameConfig, seed: u64) {
    println!("\n=== {} ===\n", title);
    let names: Vec<String> = config.strategies.iter().map(|s| s.to_string()).collect();
    println!("Players: {} ({})", config.num_players, names.join(", "));
    println!("Domino size: double-{}", config.domino_size);
    println!("Seed: {}", seed);
    println!();
}

fn play_game(config: &GameConfig, seed: u64) {
    print_header("Mexican Train", config, seed);

    let result = match run_game(config, seed) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("✗ Game failed: {}", e);
            std::process::exit(1);
        }
    };

    print!("{:>6}", "Round");
    for seat in 0..config.num_players {
        print!(" {:>6}", format!("P{}", seat));
    }
    println!("  Turns");
    for round in &result.rounds {
        print!("{:>6}", round.round_value);
        for penalty in &round.penalties {
            print!(" {:>6}", penalty);
        }
        println!("  {:>5}", round.turns);
    }
    println!("{:-<1$}", "", 8 + 7 * config.num_players + 5);
    print!("{:>6}", "Total");
    for total in &result.totals {
        print!(" {:>6}", total);
    }
    println!("\n");

    println!(
        "✓ Player {} ({}) wins with {} points",
        result.winner, result.strategies[result.winner], result.totals[result.winner]
    );
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} games ({eta})") {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar
}

fn run_simulation(config: &GameConfig, num_games: usize, seed: u64) {
    print_header("Mexican Train Simulation", config, seed);
    println!("Games: {}\n", num_games);

    let start = std::time::Instant::now();
    let bar = progress_bar(num_games);
    let summary = match simulate_games(config, num_games, seed, Some(&bar)) {
        Ok(summary) => summary,
        Err(e) => {
            bar.abandon();
            eprintln!("✗ Simulation failed: {}", e);
            std::process::exit(1);
        }
    };
    bar.finish_and_clear();
    let elapsed = start.elapsed();

    println!("=== Results ===\n");
    println!("{:6} {:12} {:>10} {:>10}", "Seat", "Strategy", "Avg score", "Win rate");
    println!("{:-<41}", "");
    for player in &summary.players {
        println!(
            "{:6} {:12} {:>10.1} {:>9.1}%",
            player.seat,
            player.strategy.to_string(),
            player.average_score,
            player.win_rate * 100.0
        );
    }
    if summary.stalled_rounds > 0 {
        println!("\nStalled rounds: {}", summary.stalled_rounds);
    }

    println!();
    println!(
        "Simulation completed in {:.2?} ({:.0} games/sec)",
        elapsed,
        num_games as f64 / elapsed.as_secs_f64()
    );
}

fn run_collection(config: &GameConfig, num_games: usize, seed: u64, output: Option<&Path>) {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format!(
            "records_{}.jsonl",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        )),
    };

    println!("\n=== Mexican Train Data Collection ===\n");
    println!("Players: {}", config.num_players);
    println!("Domino size: double-{}", config.domino_size);
    println!("Games: {}", num_games);
    println!("Seed: {}", seed);
    println!("Output: {}\n", path.display());

    let bar = progress_bar(num_games);
    let records = match collect_records(config.num_players, config.domino_size, num_games, seed, Some(&bar)) {
        Ok(records) => records,
        Err(e) => {
            bar.abandon();
            eprintln!("✗ Collection failed: {}", e);
            std::process::exit(1);
        }
    };
    bar.finish_and_clear();

    match write_records(&path, &records) {
        Ok(()) => println!("✓ Wrote {} records to {}", records.len(), path.display()),
        Err(e) => {
            eprintln!("✗ Failed to write '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn write_records(path: &Path, records: &[PlayRecord]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
