use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use wodboard::config::{self, Config};
use wodboard::event::load_event_file;
use wodboard::output;
use wodboard::score::{
    decode_score, encode_rounds, format_rounds, parse_score, Aggregation, DecodeOptions,
    RoundInput, Scheme,
};
use wodboard::scoring::{
    calculate_event_points, compute_standings, validate_scoring, EventResult, PointsPolicy,
    ScoringConfig,
};
use wodboard::ScoringError;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a raw performance ("12:34", "5+12", "225") into its integer form
    Encode { scheme: Scheme, raw: String },
    /// Decode an encoded value back into display form
    Decode {
        scheme: Scheme,
        #[arg(allow_negative_numbers = true)]
        value: i64,
        /// Append the unit ("150 reps", "225 lbs")
        #[arg(short, long)]
        unit: bool,
    },
    /// Encode several rounds and aggregate them into one result
    Rounds {
        scheme: Scheme,
        /// max, min, sum, average, first or last
        #[arg(short, long, default_value = "max")]
        aggregate: Aggregation,
        #[arg(required = true)]
        rounds: Vec<String>,
    },
    /// Show the points table for the configured algorithm
    Table {
        /// Number of positions to show
        #[arg(short = 'n', long, default_value_t = 30)]
        size: usize,
    },
    /// Edit the points table (switches to a custom table)
    Points {
        #[command(subcommand)]
        action: PointsAction,
    },
    /// Rank one event file and award points
    Rank {
        event_file: PathBuf,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
        /// JSON output
        #[arg(long, conflicts_with = "tsv")]
        json: bool,
    },
    /// Total several event files into overall standings
    Standings {
        #[arg(required = true)]
        event_files: Vec<PathBuf>,
        #[arg(long)]
        tsv: bool,
        #[arg(long, conflicts_with = "tsv")]
        json: bool,
    },
    /// Check the scoring configuration and print a summary
    Validate,
}

#[derive(Subcommand, Debug)]
enum PointsAction {
    /// Set the points for a 1-based position
    Set { position: u32, points: i64 },
    /// Return one position to its base value
    Reset { position: u32 },
    /// Drop every override and return to the base algorithm
    ResetAll,
}

#[derive(Parser, Debug)]
#[command(name = "wodboard")]
#[command(about = "Competition scoring and leaderboard CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/wodboard/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match config::load_config(config_path.clone()) {
        Ok(c) => c,
        Err(e) => fail(EXIT_CONFIG, &format!("Config error: {:#}", e)),
    };

    // Validate scoring config at startup
    let scoring = config.effective_scoring();
    if let Err(errors) = validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let use_colors = output::should_use_colors();

    match cli.command {
        Commands::Encode { scheme, raw } => {
            let result = parse_score(&raw, scheme);
            match result.encoded {
                Some(encoded) => println!("{}", encoded),
                None => fail(
                    EXIT_INPUT,
                    result.error.as_deref().unwrap_or("invalid score"),
                ),
            }
        }
        Commands::Decode {
            scheme,
            value,
            unit,
        } => {
            if let Err(e) = scheme.validate_encoded(value) {
                fail(EXIT_INPUT, &e);
            }
            println!(
                "{}",
                decode_score(value, scheme, DecodeOptions { include_unit: unit })
            );
        }
        Commands::Rounds {
            scheme,
            aggregate,
            rounds,
        } => {
            let inputs: Vec<RoundInput> = rounds.into_iter().map(RoundInput::new).collect();
            let result = encode_rounds(&inputs, scheme, aggregate);
            for error in &result.errors {
                eprintln!("Skipping round {}: {}", error.index + 1, error.error);
            }
            println!("{}", format_rounds(&result.rounds).join(" | "));
            match result.aggregated {
                Some(value) => println!(
                    "{} ({})",
                    decode_score(value, scheme, DecodeOptions { include_unit: true }),
                    value
                ),
                None => fail(EXIT_INPUT, "No valid rounds"),
            }
        }
        Commands::Table { size } => {
            let policy = scoring
                .policy()
                .unwrap_or_else(|e| fail(EXIT_CONFIG, &format!("Config error: {}", e)));
            let Some(table) = policy.table(size) else {
                fail(
                    EXIT_INPUT,
                    &ScoringError::NotTableDriven(policy.algorithm()).to_string(),
                );
            };
            let overridden: Vec<u32> = match &policy {
                PointsPolicy::Custom { overrides, .. } => overrides.keys().copied().collect(),
                _ => Vec::new(),
            };
            println!("{}", scoring.algorithm.display_name());
            println!("{}", output::format_points_table(&table, &overridden, use_colors));
        }
        Commands::Points { action } => {
            edit_points(config, config_path, action);
        }
        Commands::Rank {
            event_file,
            tsv,
            json,
        } => {
            let (_, result) = rank_event_file(&event_file, &scoring);
            if json {
                print_json(&result);
            } else if tsv {
                println!("{}", output::format_event_tsv(&result.placements));
            } else {
                println!("{}", output::format_event_table(&result.placements, use_colors));
            }
        }
        Commands::Standings {
            event_files,
            tsv,
            json,
        } => {
            let events: Vec<(String, EventResult)> = event_files
                .iter()
                .map(|path| rank_event_file(path, &scoring))
                .collect();
            let standings = compute_standings(&events, &scoring)
                .unwrap_or_else(|e| fail(EXIT_CONFIG, &format!("Standings error: {}", e)));
            if json {
                print_json(&standings);
            } else if tsv {
                println!("{}", output::format_standings_tsv(&standings));
            } else {
                println!("{}", output::format_standings_table(&standings, use_colors));
            }
        }
        Commands::Validate => {
            if let Err(e) = scoring.policy() {
                fail(EXIT_CONFIG, &format!("Config error: {}", e));
            }
            println!("Scoring config OK: {}", scoring.algorithm.display_name());
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(code);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(EXIT_INPUT, &format!("Failed to serialize output: {}", e)),
    }
}

/// Load, convert and rank one event file, exiting on failure.
fn rank_event_file(path: &PathBuf, scoring: &ScoringConfig) -> (String, EventResult) {
    let event = load_event_file(path).unwrap_or_else(|e| fail(EXIT_INPUT, &format!("{:#}", e)));
    let (entries, errors) = event.to_entries();
    if !errors.is_empty() {
        eprintln!(
            "Skipped {} invalid row(s) in {}:",
            errors.len(),
            event.display_name()
        );
        eprintln!("{}", output::format_row_errors(&errors));
    }

    let result = calculate_event_points(&entries, scoring).unwrap_or_else(|e| {
        let code = match e {
            ScoringError::InvalidConfig(_)
            | ScoringError::MissingSubConfig { .. }
            | ScoringError::MissingHeadToHeadEvent => EXIT_CONFIG,
            _ => EXIT_INPUT,
        };
        fail(code, &format!("{}: {}", event.display_name(), e))
    });

    let id = event
        .id
        .clone()
        .unwrap_or_else(|| event.display_name().to_string());
    (id, result)
}

fn edit_points(mut config: Config, config_path: Option<PathBuf>, action: PointsAction) {
    let path = match config_path {
        Some(p) => p,
        None => config::get_config_path()
            .unwrap_or_else(|e| fail(EXIT_CONFIG, &format!("Config error: {:#}", e))),
    };

    let mut scoring = config.effective_scoring();
    let result = match action {
        PointsAction::Set { position, points } => scoring.set_point(position, points),
        PointsAction::Reset { position } => scoring.reset_point(position),
        PointsAction::ResetAll => scoring.reset_points(),
    };
    if let Err(e) = result {
        fail(EXIT_INPUT, &e.to_string());
    }

    config.scoring = Some(scoring);
    if let Err(e) = config::save_config(&path, &config) {
        fail(EXIT_CONFIG, &format!("{:#}", e));
    }

    let algorithm = config.effective_scoring().algorithm;
    println!(
        "Saved {} (algorithm: {})",
        path.display(),
        algorithm.display_name()
    );
}
