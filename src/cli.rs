//! CLI definition and dispatch.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::{CsvAdapter, DEFAULT_DELIMITER};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config::ScreenConfig;
use crate::domain::config_validation::{
    check_screen_config, validate_gordon_config, validate_screen_config,
};
use crate::domain::error::ScreenerError;
use crate::domain::gordon::GordonConfig;
use crate::domain::pipeline::{analyze_equities, analyze_funds};
use crate::domain::report::{EQUITY_WORKBOOK, FUND_WORKBOOK, equity_workbook, fund_workbook};
use crate::domain::table::RawTable;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::table_port::TablePort;

pub const DEFAULT_OUT_DIR: &str = "out";

#[derive(Parser, Debug)]
#[command(
    name = "fundscreen",
    about = "Screen, value and rank B3 equities and real-estate funds"
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen equities, value them and rank the survivors
    Screen(ScreenArgs),
    /// Validate a configuration file and print the resolved parameters
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScreenArgs {
    /// Equity fundamentals export (CSV)
    #[arg(long, required_unless_present = "snapshot", conflicts_with = "snapshot")]
    pub acoes: Option<PathBuf>,
    /// Quote-API JSON snapshot, read instead of a CSV export
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
    /// Real-estate fund export (CSV)
    #[arg(long)]
    pub fii: Option<PathBuf>,
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Minimum dividend yield, percent
    #[arg(long)]
    pub dy: Option<f64>,
    /// Minimum ROE, percent
    #[arg(long, allow_negative_numbers = true)]
    pub roe: Option<f64>,
    #[arg(long)]
    pub pl_max: Option<f64>,
    #[arg(long)]
    pub pvp_max: Option<f64>,
    /// Skip the Graham table
    #[arg(long)]
    pub no_graham: bool,
    /// Gordon discount rate, decimal
    #[arg(long)]
    pub k: Option<f64>,
    /// Gordon growth rate, decimal
    #[arg(long, allow_negative_numbers = true)]
    pub g: Option<f64>,
}

/// Counts and destinations of one screening run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub equity_dir: PathBuf,
    pub screened: usize,
    /// `None` when the Graham table was skipped.
    pub graham: Option<usize>,
    pub ranked: usize,
    pub fund_dir: Option<PathBuf>,
    pub valued: Option<usize>,
    pub written: Vec<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Dispatch a parsed command line.
pub fn execute(cli: Cli) -> Result<(), ScreenerError> {
    match cli.command {
        Command::Screen(args) => run_screen(&args),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the verbosity count.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ScreenerError> {
    FileConfigAdapter::from_file(path).map_err(|e| ScreenerError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Resolve thresholds and weights: command line, then config file, then defaults.
pub fn build_screen_config(
    config: &dyn ConfigPort,
    args: &ScreenArgs,
) -> Result<ScreenConfig, ScreenerError> {
    let mut screen = ScreenConfig::from_config(config)?;
    if let Some(v) = args.dy {
        screen.dy_min = v;
    }
    if let Some(v) = args.roe {
        screen.roe_min = v;
    }
    if let Some(v) = args.pl_max {
        screen.pl_max = v;
    }
    if let Some(v) = args.pvp_max {
        screen.pvp_max = v;
    }
    if args.no_graham {
        screen.apply_graham = false;
    }
    check_screen_config(&screen)?;
    Ok(screen)
}

pub fn build_gordon_config(
    config: &dyn ConfigPort,
    args: &ScreenArgs,
) -> Result<GordonConfig, ScreenerError> {
    let defaults = GordonConfig::default();
    let k = args
        .k
        .unwrap_or_else(|| config.get_double("gordon", "k", defaults.k));
    let g = args
        .g
        .unwrap_or_else(|| config.get_double("gordon", "g", defaults.g));
    GordonConfig::new(k, g)
}

pub fn resolve_out_dir(config: &dyn ConfigPort, args: &ScreenArgs) -> PathBuf {
    args.out
        .clone()
        .or_else(|| config.get_string("output", "dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR))
}

/// Delimiter names accepted in `[input] delimiter`.
pub fn parse_delimiter(value: &str) -> Option<u8> {
    match value.trim().to_lowercase().as_str() {
        "semicolon" => Some(b';'),
        "comma" => Some(b','),
        "tab" => Some(b'\t'),
        "pipe" => Some(b'|'),
        other => match other.as_bytes() {
            [b] if b.is_ascii() && !b.is_ascii_alphanumeric() => Some(*b),
            _ => None,
        },
    }
}

pub fn resolve_delimiter(config: &dyn ConfigPort) -> Result<u8, ScreenerError> {
    match config.get_string("input", "delimiter") {
        None => Ok(DEFAULT_DELIMITER),
        Some(value) => parse_delimiter(&value).ok_or_else(|| ScreenerError::ConfigInvalid {
            section: "input".into(),
            key: "delimiter".into(),
            reason: format!("unknown delimiter {value:?} (expected semicolon, comma, tab or pipe)"),
        }),
    }
}

/// Run every transform, then write the workbooks.
///
/// Both analyses finish before anything is written, so a failing fund table
/// leaves no partial equity output behind.
pub fn run_pipeline(
    equities: &RawTable,
    funds: Option<&RawTable>,
    screen: &ScreenConfig,
    gordon: &GordonConfig,
    report: &dyn ReportPort,
    out_dir: &Path,
) -> Result<RunSummary, ScreenerError> {
    let equity = analyze_equities(equities, screen)?;
    let fund = funds.map(|raw| analyze_funds(raw, gordon)).transpose()?;

    let mut written = report.write(&equity_workbook(equities, &equity), out_dir)?;
    let equity_dir = out_dir.join(EQUITY_WORKBOOK);

    let (fund_dir, valued) = match &fund {
        Some(analysis) => {
            written.extend(report.write(&fund_workbook(analysis), out_dir)?);
            (
                Some(out_dir.join(FUND_WORKBOOK)),
                Some(analysis.gordon.len()),
            )
        }
        None => (None, None),
    };

    Ok(RunSummary {
        equity_dir,
        screened: equity.screened.len(),
        graham: equity.graham.as_ref().map(Vec::len),
        ranked: equity.ranking.len(),
        fund_dir,
        valued,
        written,
    })
}

fn run_screen(args: &ScreenArgs) -> Result<(), ScreenerError> {
    let adapter = match &args.config {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            load_config(path)?
        }
        None => FileConfigAdapter::empty(),
    };

    let screen = build_screen_config(&adapter, args)?;
    let gordon = build_gordon_config(&adapter, args)?;
    let out_dir = resolve_out_dir(&adapter, args);
    let csv = CsvAdapter::new(resolve_delimiter(&adapter)?);
    debug!(?screen, ?gordon, out_dir = %out_dir.display(), "parameters resolved");

    let equities = read_equities(args, &csv)?;
    let funds = match &args.fii {
        Some(path) => {
            eprintln!("Reading funds from {}", path.display());
            Some(csv.read_table(path)?)
        }
        None => None,
    };

    let summary = run_pipeline(&equities, funds.as_ref(), &screen, &gordon, &csv, &out_dir)?;
    print_summary(&summary);
    Ok(())
}

fn read_equities(args: &ScreenArgs, csv: &CsvAdapter) -> Result<RawTable, ScreenerError> {
    if let Some(path) = &args.acoes {
        eprintln!("Reading equities from {}", path.display());
        return csv.read_table(path);
    }
    match &args.snapshot {
        Some(path) => {
            eprintln!("Reading quote snapshot from {}", path.display());
            read_snapshot(path)
        }
        None => Err(ScreenerError::ConfigInvalid {
            section: "input".into(),
            key: "acoes".into(),
            reason: "either --acoes or --snapshot is required".into(),
        }),
    }
}

#[cfg(feature = "snapshot")]
fn read_snapshot(path: &Path) -> Result<RawTable, ScreenerError> {
    use crate::adapters::snapshot_adapter::SnapshotAdapter;
    SnapshotAdapter::new().read_table(path)
}

#[cfg(not(feature = "snapshot"))]
fn read_snapshot(path: &Path) -> Result<RawTable, ScreenerError> {
    Err(ScreenerError::Source {
        path: path.display().to_string(),
        reason: "snapshot feature is required to read quote snapshots".into(),
    })
}

fn print_summary(summary: &RunSummary) {
    let graham = summary
        .graham
        .map_or_else(|| "off".to_string(), |n| n.to_string());
    eprintln!(
        "Acoes -> {} | Filtrado: {} | Graham: {} | Ranking: {}",
        summary.equity_dir.display(),
        summary.screened,
        graham,
        summary.ranked,
    );
    if let (Some(dir), Some(valued)) = (&summary.fund_dir, summary.valued) {
        eprintln!("FIIs  -> {} | Gordon: {}", dir.display(), valued);
    }
}

fn run_validate(config_path: &Path) -> Result<(), ScreenerError> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;

    validate_screen_config(&adapter)?;
    validate_gordon_config(&adapter)?;
    let delimiter = resolve_delimiter(&adapter)?;

    let args = ScreenArgs::default();
    let screen = build_screen_config(&adapter, &args)?;
    let gordon = build_gordon_config(&adapter, &args)?;
    let out_dir = resolve_out_dir(&adapter, &args);

    eprintln!("\nScreen:");
    eprintln!("  dy_min:       {}", screen.dy_min);
    eprintln!("  roe_min:      {}", screen.roe_min);
    eprintln!("  pl_max:       {}", screen.pl_max);
    eprintln!("  pvp_max:      {}", screen.pvp_max);
    eprintln!("  apply_graham: {}", screen.apply_graham);
    eprintln!("\nRanking weights:");
    eprintln!("  roe:        {:.4}", screen.weights.roe);
    eprintln!("  dy:         {:.4}", screen.weights.dy);
    eprintln!("  valuation:  {:.4}", screen.weights.valuation);
    eprintln!("  leverage:   {:.4}", screen.weights.leverage);
    eprintln!("\nGordon:");
    eprintln!("  k: {}", gordon.k);
    eprintln!("  g: {}", gordon.g);
    eprintln!("\nInput delimiter: {:?}", delimiter as char);
    eprintln!("Output dir:      {}", out_dir.display());

    eprintln!("\nConfiguration is valid");
    Ok(())
}
