use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use standings::ledger::{Gender, ParticipantLedger};
use standings::scoring::RankedRow;
use standings::source::ScoreSource;

const EXIT_SUCCESS: i32 = 0;
const EXIT_SOURCES: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_OUTPUT: i32 = 5;

#[derive(Subcommand, Debug, Clone, Copy)]
enum Commands {
    /// Rank participants across all sources (default if no subcommand)
    Rank,
    /// Validate the config file and list the resolved sources
    Check,
}

/// Ranking flags. Global so `standings --format tsv` and `standings rank --format tsv` agree.
#[derive(Args, Debug)]
struct RankArgs {
    /// Only show participants of this gender
    #[arg(long, value_enum, global = true)]
    gender: Option<GenderArg>,

    /// Only show participants of this club (case-insensitive)
    #[arg(long, global = true)]
    club: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Also write the full standings as JSON to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GenderArg {
    Male,
    Female,
    Unknown,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
            GenderArg::Unknown => Gender::Unknown,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "standings")]
#[command(about = "Merge per-event results into one ranked leaderboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/standings/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(flatten)]
    rank: RankArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Diagnostics go to stderr. `RUST_LOG` overrides the verbosity flag.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "standings=debug" } else { "standings=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Rank);
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let (config, config_path) = match standings::config::load_config(config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = config.validate() {
        eprintln!("Config errors in {}:", config_path.display());
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let base_dir = standings::config::base_dir_of(&config_path);
    let sources = match config.resolve_sources(&base_dir) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    tracing::info!(
        sources = sources.len(),
        config = %config_path.display(),
        "loaded config"
    );

    if let Commands::Check = command {
        println!("Config OK: {}", config_path.display());
        println!("Events: {}", config.events.slot_labels().join(", "));
        println!("Policy: {:?}, identity: {:?}", config.events.policy, config.identity);
        println!("Sources:");
        for source in &sources {
            let status = if source.path().exists() { "" } else { "  (missing)" };
            println!("  {} -> {}{}", source.name(), source.path().display(), status);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let args = cli.rank;

    // Ingest every source as one batch; failures are warnings, not fatal
    let mut ledger = ParticipantLedger::new(config.identity);
    let report = standings::source::collect(
        sources.iter().map(|s| s as &dyn ScoreSource),
        &mut ledger,
    );

    if report.all_failed() {
        eprintln!("All sources failed. Check the source paths in {}.", config_path.display());
        std::process::exit(EXIT_SOURCES);
    }
    tracing::info!(
        participants = ledger.len(),
        observations = report.observations,
        warnings = report.warnings.len(),
        identity = ?ledger.policy(),
        "collected sources"
    );

    let table = standings::scoring::rank(ledger.all_records(), &config.events);

    if let Some(ref path) = args.output {
        let export = standings::output::StandingsExport::new(&config.events, table.rows().to_vec());
        if let Err(e) = standings::output::write_export(path, &export) {
            eprintln!("Output error: {:#}", e);
            std::process::exit(EXIT_OUTPUT);
        }
        tracing::info!(path = %path.display(), "wrote standings export");
    }

    // Sub-views filter the ranked table without reordering it
    let view: Vec<&RankedRow> = match (args.gender, args.club.as_deref()) {
        (Some(gender), Some(club)) => table
            .by_gender(gender.into())
            .into_iter()
            .filter(|r| r.club.eq_ignore_ascii_case(club))
            .collect(),
        (Some(gender), None) => table.by_gender(gender.into()),
        (None, Some(club)) => table.by_club(club),
        (None, None) => table.rows().iter().collect(),
    };

    match args.format {
        OutputFormat::Table => {
            let use_colors = standings::output::should_use_colors();
            if cli.verbose && !view.is_empty() {
                for row in &view {
                    println!("{}", standings::output::format_row_detail(row, use_colors));
                    println!();
                }
            }
            println!("{}", standings::output::format_standings_table(&view, use_colors));
        }
        OutputFormat::Tsv => {
            println!("{}", standings::output::format_tsv(&view));
        }
        OutputFormat::Json => {
            let rows = view.into_iter().cloned().collect();
            let export = standings::output::StandingsExport::new(&config.events, rows);
            match standings::output::to_json(&export) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Output error: {:#}", e);
                    std::process::exit(EXIT_OUTPUT);
                }
            }
        }
    }

    if cli.verbose {
        eprintln!();
        eprintln!(
            "Total: {} participants from {} sources in {:?}",
            table.len(),
            report.sources_ok,
            start_time.elapsed()
        );
    }

    std::process::exit(EXIT_SUCCESS);
}
