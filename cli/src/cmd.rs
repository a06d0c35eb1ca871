use std::path::PathBuf;

use anyhow::Context as _;

use tcjudge_core::{
    config::{Config, Verbosity},
    run_suite, testing::DisabledPredicate, Problem, Scoring, TestTable,
};

use crate::config;

/// Flags every solution binary accepts. Flatten into your own parser:
///
/// ```ignore
/// #[derive(clap::Parser)]
/// struct Cli {
///     #[command(flatten)]
///     tester: tcjudge_cli::TesterArgs,
/// }
/// ```
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TesterArgs {
    /// full (0), compact (1) or only (2)
    #[arg(short = 'v', long)]
    pub verbosity: Option<Verbosity>,

    /// Seconds allowed per case, checked after the case finishes
    #[arg(short = 't', long)]
    pub time_limit: Option<f64>,

    /// Kill a case still running after this many seconds
    #[arg(long)]
    pub kill_after: Option<f64>,

    /// Points the problem is worth
    #[arg(short = 's', long, default_value_t = 250.0)]
    pub score: f64,

    /// Unix time the problem was opened [default: now]
    #[arg(long)]
    pub open_time: Option<i64>,

    /// Case indices to skip, e.g. `-d 0,3`
    #[arg(short = 'd', long, value_delimiter = ',')]
    pub disable: Vec<usize>,

    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// File used to hand results back from each case [default: private temp file]
    #[arg(long)]
    pub relay_path: Option<PathBuf>,

    /// Exit with 1 when any case fails
    #[arg(long)]
    pub strict: bool,

    /// Config file [default: nearest tcjudge.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print an example tcjudge.toml and exit
    #[arg(long)]
    pub example_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
#[clap(rename_all = "lower")]
pub enum ColorChoice {
    /// Color when stdout is a terminal and the config allows it
    #[default]
    Auto,
    Always,
    Never,
}

/// Runs `table` for problem `P` under the given flags and returns the process
/// exit code. `disabled` is the program's own predicate; `--disable` adds to it.
pub async fn launch<P: Problem>(
    table: &TestTable<P>,
    disabled: &impl DisabledPredicate,
    args: &TesterArgs,
) -> anyhow::Result<i32> {
    if args.example_config {
        print!("{}", Config::example_toml()?);
        return Ok(0);
    }

    let cfg = config::load_with_args(
        args,
        std::env::current_dir().context("Failed to get current dir")?,
    )?;
    match &cfg.source_config_file {
        Some(path) => log::info!("Using config {:?}", path),
        None => log::info!("No tcjudge.toml found, using defaults"),
    }
    colored::control::set_override(cfg.report.color);

    let skipped = &args.disable;
    let disabled = |i: usize| disabled.is_disabled(i) || skipped.contains(&i);
    let scoring = Scoring {
        points: args.score,
        open_time: args
            .open_time
            .unwrap_or_else(|| chrono::Utc::now().timestamp()),
    };

    let report = run_suite::<P>(table, &disabled, scoring, &cfg).await?;
    Ok(report.exit_code(cfg.run.strict_exit))
}
