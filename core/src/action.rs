pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}
use std::io::Write as _;
use std::time::Duration;

use error::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::color::Palette;
use crate::config::{Config, Verbosity};
use crate::score;
use crate::style;
use crate::testing::relay::RelaySlot;
use crate::testing::runner::{self, ChildAssignment};
use crate::testing::{
    is_good, CaseReport, DisabledPredicate, JudgeCode, Problem, SuiteReport, TestOutcome,
    TestRunner, TestTable,
};

/// How the run is scored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scoring {
    /// Points the problem is worth, e.g. 250.
    pub points: f64,
    /// Unix time (seconds) the problem was opened.
    pub open_time: i64,
}

/// Runs every case of `table` in order, each in its own process, and prints
/// the report selected by `cfg.report.verbosity`.
///
/// When the current process is itself an isolated case (see
/// [`ChildAssignment`]), this solves that one case and exits instead.
pub async fn run_suite<P: Problem>(
    table: &TestTable<P>,
    disabled: &impl DisabledPredicate,
    scoring: Scoring,
    cfg: &Config,
) -> Result<SuiteReport> {
    let palette = Palette::new(cfg.report.color);

    if let Some(assignment) = ChildAssignment::from_env()? {
        runner::run_assigned_case::<P>(&assignment, table, cfg.time_limit(), palette);
    }

    let relay = match &cfg.run.relay_path {
        Some(path) => RelaySlot::at(path),
        None => RelaySlot::temporary().context("Cannot set up the relay channel")?,
    };
    let verbosity = cfg.report.verbosity;
    let runner = TestRunner::for_current_exe(relay)?
        .narrate(verbosity.narrates())
        .kill_after(cfg.kill_after());

    log::info!(
        "Running {} cases of {} (time limit {:?})",
        table.len(),
        P::NAME,
        cfg.time_limit()
    );

    match verbosity {
        Verbosity::Only => print_flush(&format!("{}\n\n", P::NAME)),
        Verbosity::Compact => print_flush(&format!("{}: ", P::NAME)),
        Verbosity::Full => {}
    }

    let num_cases = table.len();
    let mut cases = Vec::with_capacity(num_cases);
    for index in 0..num_cases {
        let outcome = if disabled.is_disabled(index) {
            log::debug!("Case {} is disabled", index);
            TestOutcome::disabled()
        } else {
            self::run_one(&runner, index, verbosity).await?
        };

        if verbosity == Verbosity::Full && outcome.judge != JudgeCode::Disabled {
            println!(" {}", palette.glyph(outcome.judge));
            println!("{}", style::bar(&palette, cfg.report.bar_width));
        }

        let line = style::report_line(&palette, index, num_cases, &outcome, cfg.report.max_width);
        match verbosity {
            Verbosity::Only => println!("{}", line),
            Verbosity::Compact => print_flush(&format!("{} ", palette.glyph(outcome.judge))),
            Verbosity::Full => {}
        }
        cases.push(CaseReport {
            index,
            outcome,
            line,
        });
    }

    let judges: Vec<JudgeCode> = cases.iter().map(|c| c.outcome.judge).collect();
    let good = is_good(judges.iter().copied());
    let now = chrono::Utc::now().timestamp();
    let final_score = score::submission_score(
        scoring.points,
        score::elapsed_since(scoring.open_time, now),
    );

    if verbosity == Verbosity::Full {
        print!("{}\n\n", P::NAME);
        for c in &cases {
            println!("{}", c.line);
        }
    }
    println!("{}", self::score_line(&palette, final_score, good, verbosity));
    if verbosity == Verbosity::Full {
        println!("{}", style::summary(&palette, &judges));
    }

    Ok(SuiteReport {
        problem: P::NAME,
        cases,
        good,
        score: final_score,
    })
}

async fn run_one(runner: &TestRunner, index: usize, verbosity: Verbosity) -> Result<TestOutcome> {
    if !verbosity.shows_spinner() {
        return runner.run(index).await;
    }

    let spinner = ProgressBar::new_spinner()
        .with_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?)
        .with_message(format!("Testcase {} ...", index));
    spinner.enable_steady_tick(Duration::from_millis(80));
    let res = runner.run(index).await;
    spinner.finish_and_clear();
    res
}

/// Score to two decimals, green for a good run and in the fatal tone
/// otherwise. Compact mode wraps it as `(score).` after the glyphs.
pub fn score_line(palette: &Palette, score: f64, good: bool, verbosity: Verbosity) -> String {
    let s = palette.grade(&format!("{:.2}", score), good);
    match verbosity {
        Verbosity::Compact => format!("({}).", s),
        Verbosity::Full | Verbosity::Only => format!("\n{}", s),
    }
}

fn print_flush(s: &str) {
    print!("{}", s);
    let _ = std::io::stdout().flush();
}
