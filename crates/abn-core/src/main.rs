//! A/B/n Conversion Testing CLI
//!
//! The main entry point for `abn`, handling:
//! - CSV loading and dataset validation
//! - Frequentist and Bayesian analysis
//! - Report rendering (JSON, Markdown, one-line summary)
//! - Configuration inspection

use abn_common::{Dataset, Error, GroupLabel, OutputFormat, StructuredError, SCHEMA_VERSION};
use abn_config::{load_config, AnalysisConfig, ResolvedConfig};
use abn_core::adapter::{normalize, ColumnMapping, RawTable};
use abn_core::analysis::{BayesianAnalyzer, FrequentistAnalyzer};
use abn_core::exit_codes::ExitCode;
use abn_core::logging::{
    event_names, init_logging, level_from_flags, LogConfig, LogFormat, Stage,
};
use abn_core::output::render;
use abn_core::report::compose;
use abn_core::log_event;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// A/B/n conversion testing: pairwise z-tests and Bayesian probability of being best
#[derive(Parser)]
#[command(name = "abn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to analysis.json (overrides ABN_CONFIG / ABN_CONFIG_DIR / XDG lookup)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both analyses on a CSV file and print the report
    Analyze(AnalyzeArgs),

    /// Validate configuration and, optionally, an input file
    Check(CheckArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// CSV file with one row per user
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Monte Carlo draws per group
    #[arg(long)]
    draws: Option<u64>,

    /// RNG seed for reproducible posterior simulation
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    columns: ColumnArgs,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// CSV file to validate against the configured columns
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    #[command(flatten)]
    columns: ColumnArgs,
}

#[derive(Args, Debug, Default)]
struct ColumnArgs {
    /// Column holding the user identifier
    #[arg(long)]
    id_column: Option<String>,

    /// Column holding the group label
    #[arg(long)]
    group_column: Option<String>,

    /// Column holding the 0/1 outcome
    #[arg(long)]
    converted_column: Option<String>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the resolved configuration and where it came from
    Show,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = level_from_flags(cli.global.verbose, cli.global.quiet);
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let result = match &cli.command {
        Commands::Analyze(args) => run_analyze(&cli.global, args),
        Commands::Check(args) => run_check(&cli.global, args),
        Commands::Config(args) => match args.command {
            ConfigCommands::Show => run_config_show(&cli.global),
        },
        Commands::Version => {
            print_version(&cli.global);
            Ok(())
        }
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => output_error(&cli.global, &err),
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> Result<(), Error> {
    let (config, resolved) = load_resolved(global)?;
    let draws = args.draws.unwrap_or(config.bayesian.draws);
    let seed = args.seed.or(config.bayesian.seed);

    log_event!(
        INFO,
        event_names::RUN_STARTED,
        Stage::Init,
        "analysis started",
        input = display(args.input.display()),
        draws = draws,
        seeded = seed.is_some(),
        config_source = display(resolved.source)
    );

    let dataset = load_dataset(&args.input, &config, &args.columns)?;

    let frequentist = FrequentistAnalyzer::new(config.frequentist.significance_level)?
        .analyze(&dataset)?;
    log_event!(
        INFO,
        event_names::FREQ_FINISHED,
        Stage::Frequentist,
        "pairwise tests finished",
        comparisons = frequentist.comparisons.len(),
        best = frequentist.best_group.as_str()
    );

    let bayes_cfg = &config.bayesian;
    let bayesian = BayesianAnalyzer::new(
        bayes_cfg.prior_alpha,
        bayes_cfg.prior_beta,
        bayes_cfg.credible_mass,
    )?
    .analyze(&dataset, draws, seed)?;
    log_event!(
        INFO,
        event_names::BAYES_FINISHED,
        Stage::Bayesian,
        "posterior simulation finished",
        draws = bayesian.draws,
        best = bayesian.best_group.as_str()
    );

    let report = compose(&frequentist, &bayesian);
    log_event!(
        INFO,
        event_names::REPORT_COMPOSED,
        Stage::Report,
        "report composed",
        verdicts_agree = report.verdicts_agree()
    );

    print!("{}", render(&report, global.format)?);
    log_event!(DEBUG, event_names::RUN_FINISHED, Stage::Report, "analysis finished");
    Ok(())
}

fn run_check(global: &GlobalOpts, args: &CheckArgs) -> Result<(), Error> {
    let (config, resolved) = load_resolved(global)?;

    let data = match &args.input {
        Some(path) => {
            let dataset = load_dataset(path, &config, &args.columns)?;
            Some(serde_json::json!({
                "path": path.display().to_string(),
                "rows": dataset.len(),
                "groups": dataset.groups(),
            }))
        }
        None => None,
    };

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "status": "ok",
        "config": {
            "source": resolved.source,
            "path": resolved.path.as_ref().map(|p| p.display().to_string()),
            "using_defaults": resolved.path.is_none(),
        },
        "data": data,
    });

    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Summary => {
            let mut line = format!("ok config={}", resolved.source);
            if let Some(d) = response["data"].as_object() {
                line.push_str(&format!(
                    " rows={} groups={}",
                    d["rows"],
                    d["groups"].as_array().map_or(0, Vec::len)
                ));
            }
            println!("{line}");
        }
        OutputFormat::Md => {
            println!("# Check");
            println!();
            println!("- Config: {} ({})", describe_path(&resolved), resolved.source);
            if let Some(d) = response["data"].as_object() {
                println!("- Input: {} rows, groups {}", d["rows"], d["groups"]);
            }
            println!("- Status: ok");
        }
    }
    Ok(())
}

/// Display the resolved configuration (including defaults if no file is present).
fn run_config_show(global: &GlobalOpts) -> Result<(), Error> {
    let (config, resolved) = load_resolved(global)?;

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "source": {
                    "kind": resolved.source,
                    "path": resolved.path.as_ref().map(|p| p.display().to_string()),
                    "using_defaults": resolved.path.is_none(),
                },
                "config": config,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Summary => {
            println!(
                "source={} draws={} significance_level={} prior=Beta({}, {})",
                resolved.source,
                config.bayesian.draws,
                config.frequentist.significance_level,
                config.bayesian.prior_alpha,
                config.bayesian.prior_beta
            );
        }
        OutputFormat::Md => {
            println!("# Configuration");
            println!();
            println!("Source: {} ({})", describe_path(&resolved), resolved.source);
            println!();
            println!("```json");
            println!("{}", config.to_json_pretty()?);
            println!("```");
        }
    }
    Ok(())
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            let version_info = serde_json::json!({
                "name": "abn",
                "version": env!("CARGO_PKG_VERSION"),
                "schema_version": SCHEMA_VERSION,
            });
            println!("{}", version_info);
        }
        _ => println!("abn {}", env!("CARGO_PKG_VERSION")),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn load_resolved(global: &GlobalOpts) -> Result<(AnalysisConfig, ResolvedConfig), Error> {
    let (config, resolved) = load_config(global.config.as_deref())?;
    let event = if resolved.path.is_some() {
        event_names::CONFIG_LOADED
    } else {
        event_names::CONFIG_DEFAULT_USED
    };
    log_event!(
        DEBUG,
        event,
        Stage::Init,
        "configuration resolved",
        source = display(resolved.source)
    );
    Ok((config, resolved))
}

fn load_dataset(
    path: &Path,
    config: &AnalysisConfig,
    overrides: &ColumnArgs,
) -> Result<Dataset, Error> {
    let mut columns = ColumnMapping::from(&config.columns);
    if let Some(id) = &overrides.id_column {
        columns.id = id.clone();
    }
    if let Some(group) = &overrides.group_column {
        columns.group = group.clone();
    }
    if let Some(converted) = &overrides.converted_column {
        columns.converted = converted.clone();
    }

    let table = RawTable::from_csv_path(path)?;
    let dataset = normalize(&table, &columns).inspect_err(|err| {
        log_event!(
            DEBUG,
            event_names::DATA_REJECTED,
            Stage::Load,
            "input rejected",
            code = err.code()
        );
    })?;

    if !config.groups.is_empty() {
        let declared: Vec<GroupLabel> = config
            .groups
            .iter()
            .map(|g| GroupLabel::new(g.as_str()))
            .collect();
        dataset.require_groups(&declared)?;
    }

    log_event!(
        INFO,
        event_names::DATA_LOADED,
        Stage::Load,
        "dataset ready",
        rows = dataset.len(),
        groups = dataset.groups().len()
    );
    Ok(dataset)
}

fn describe_path(resolved: &ResolvedConfig) -> String {
    resolved
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string())
}

/// Print an error on stderr and map it to an exit code.
fn output_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    let exit_code = ExitCode::from(err);
    let structured = StructuredError::from(err);

    if global.format.is_machine_readable() {
        eprintln!("{}", structured.to_json());
    } else {
        eprintln!("{}", structured.to_human(err.headline()));
    }

    exit_code
}
