//! One process per testcase.
//!
//! The coordinator re-executes its own binary with the case index in the
//! environment. The child recognizes the assignment, solves that single case
//! with a fresh `Problem`, relays the result and exits. The parent only trusts
//! the relay slot when the child exited cleanly; any other termination is
//! classified from the exit status alone.
//!
//! The time limit is measured, not enforced: a case that never returns blocks
//! the suite unless `kill_after` is set or the child is interrupted from
//! outside (which is then reported as a crash).

use std::{
    any::Any,
    ffi::OsString,
    io::Write as _,
    path::PathBuf,
    process::Stdio,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use serde::Deserialize;
use tokio::process::Command;

use super::{
    judge::{self, Observation, Termination},
    relay::{RelayMessage, RelaySlot},
    result::*,
    testcase::*,
};
use crate::color::{Palette, Tone};
use crate::style;
use crate::value::{Describe, TolerantEq};

/// Case assignment handed to an isolated process through `TCJUDGE_*`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChildAssignment {
    pub case: usize,
    pub relay: PathBuf,
    #[serde(default)]
    pub narrate: bool,
}

impl ChildAssignment {
    pub const ENV_PREFIX: &str = "TCJUDGE_";
    pub const ENV_CASE: &str = "TCJUDGE_CASE";
    pub const ENV_RELAY: &str = "TCJUDGE_RELAY";
    pub const ENV_NARRATE: &str = "TCJUDGE_NARRATE";

    /// `None` in the coordinator process.
    pub fn from_env() -> anyhow::Result<Option<Self>> {
        if std::env::var_os(Self::ENV_CASE).is_none() {
            return Ok(None);
        }
        envy::prefixed(Self::ENV_PREFIX)
            .from_env::<Self>()
            .map(Some)
            .context("Invalid isolated case environment")
    }
}

#[derive(Debug)]
pub struct TestRunner {
    program: PathBuf,
    args: Vec<OsString>,
    relay: RelaySlot,
    narrate: bool,
    kill_after: Option<Duration>,
}

impl TestRunner {
    /// Runner that re-executes the current binary with the current arguments.
    pub fn for_current_exe(relay: RelaySlot) -> anyhow::Result<Self> {
        let program = std::env::current_exe().context("Cannot locate the current executable")?;
        let args = std::env::args_os().skip(1).collect();
        Ok(Self::new(program, args, relay))
    }

    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>, relay: RelaySlot) -> Self {
        Self {
            program: program.into(),
            args,
            relay,
            narrate: false,
            kill_after: None,
        }
    }

    pub fn narrate(mut self, narrate: bool) -> Self {
        self.narrate = narrate;
        self
    }

    pub fn kill_after(mut self, limit: Option<Duration>) -> Self {
        self.kill_after = limit;
        self
    }

    pub fn get_relay(&self) -> &RelaySlot {
        &self.relay
    }

    /// Runs case `index` in a new process and waits for it. Only failing to
    /// start the process is an error; everything the case does is an outcome.
    pub async fn run(&self, index: usize) -> anyhow::Result<TestOutcome> {
        self.relay
            .clear()
            .context("Cannot prepare relay slot for the next case")?;

        log::debug!("Spawning case {} ({:?})", index, self.program);
        let mut proc = Command::new(&self.program)
            .args(&self.args)
            .env(ChildAssignment::ENV_CASE, index.to_string())
            .env(ChildAssignment::ENV_RELAY, self.relay.path())
            .env(ChildAssignment::ENV_NARRATE, self.narrate.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| {
                format!(
                    "Failed to spawn isolated process {}",
                    self.program.to_string_lossy()
                )
            })?;

        let status = match self.kill_after {
            None => proc.wait().await,
            Some(limit) => match tokio::time::timeout(limit, proc.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    log::debug!("Case {} exceeded {:?}, killing it", index, limit);
                    proc.kill()
                        .await
                        .unwrap_or_else(|e| log::warn!("Failed to kill case {}: {:#}", index, e));
                    proc.wait().await
                }
            },
        }
        .with_context(|| format!("Failed to wait for case {}", index))?;

        let termination = Termination::from_status(status);
        log::debug!("Case {} terminated: {:?}", index, termination);

        if let Some(diag) = judge::diagnose(termination) {
            if self.narrate {
                println!("{}", diag.message);
            }
            return Ok(TestOutcome::crashed(diag.tag));
        }

        Ok(match self.relay.receive() {
            Some(msg) => TestOutcome::finished(
                msg.judge,
                msg.execution_time,
                msg.produced.unwrap_or_default(),
            ),
            None => TestOutcome::unreported(),
        })
    }
}

/// Child side: solve the assigned case, relay the result and exit.
pub fn run_assigned_case<P: Problem>(
    assignment: &ChildAssignment,
    table: &TestTable<P>,
    time_limit: Duration,
    palette: Palette,
) -> ! {
    self::install_panic_hook(assignment.narrate);

    let Some(case) = table.get(assignment.case) else {
        eprintln!(
            "Case {} is out of range ({} cases)",
            assignment.case,
            table.len()
        );
        std::process::exit(2);
    };

    let msg = self::solve_case::<P>(assignment, case, table.len(), time_limit, palette);
    let relay = RelaySlot::at(&assignment.relay);
    let code = match relay.send(&msg) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{:#}", anyhow::Error::new(e));
            1
        }
    };
    let _ = std::io::stdout().flush();
    std::process::exit(code)
}

fn solve_case<P: Problem>(
    assignment: &ChildAssignment,
    case: &Testcase<P::Input, P::Output>,
    num_cases: usize,
    time_limit: Duration,
    palette: Palette,
) -> RelayMessage {
    let narrate = assignment.narrate;
    if narrate {
        println!(
            "{}: {}",
            palette.paint(
                &format!("Test {}", style::case_num(assignment.case, num_cases)),
                Tone::Highlight
            ),
            case.input.describe()
        );
    }

    let start_at = Instant::now();
    let mut instance = P::default();
    let produced = instance.solve(case.input.clone());
    let execution_time = start_at.elapsed();
    drop(instance);

    let correct = case
        .expected
        .as_ref()
        .map_or(true, |expected| expected.tolerant_eq(&produced));

    if narrate {
        println!("Time: {} seconds.", style::secs(execution_time));
        if let (false, Some(expected)) = (correct, &case.expected) {
            println!("Desired answer:");
            println!("\t{}", expected.describe());
        }
        println!("Your answer:");
        println!("\t{}", produced.describe());
    }

    let judge = judge::classify(&Observation {
        termination: Termination::Clean,
        correct,
        execution_time,
        time_limit,
        has_oracle: case.has_oracle(),
    });

    RelayMessage {
        judge,
        execution_time,
        produced: Some(produced.describe()),
    }
}

const ARITHMETIC_PANICS: &[&str] = &[
    "attempt to divide by zero",
    "attempt to calculate the remainder with a divisor of zero",
];

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        ""
    }
}

/// Matches the messages std panics with on integer faults, e.g.
/// `attempt to add with overflow`.
pub fn is_arithmetic_panic(msg: &str) -> bool {
    ARITHMETIC_PANICS.iter().any(|&p| p == msg)
        || (msg.starts_with("attempt to ") && msg.ends_with("with overflow"))
}

/// Arithmetic panics die by SIGFPE, like the hardware fault they stand for.
/// Other panics exit with the usual code 101. The message is only echoed
/// when narrating.
fn install_panic_hook(narrate: bool) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if narrate {
            default_hook(info);
        }
        if self::is_arithmetic_panic(self::panic_message(info.payload())) {
            self::raise_arithmetic_fault();
        }
    }));
}

#[cfg(unix)]
fn raise_arithmetic_fault() {
    let _ = std::io::stdout().flush();
    // SAFETY: raise(3) has no memory-safety preconditions.
    unsafe {
        libc::raise(libc::SIGFPE);
    }
}

#[cfg(not(unix))]
fn raise_arithmetic_fault() {}

#[cfg(test)]
mod test {
    use super::*;

    fn sh(script: &str) -> TestRunner {
        let relay = RelaySlot::temporary().unwrap();
        TestRunner::new("/bin/sh", vec!["-c".into(), script.into()], relay)
    }

    #[tokio::test]
    async fn should_read_relayed_result() {
        let r = sh(r#"printf '%s' 'X{"elapsed":0.5,"produced":"6"}' > "$TCJUDGE_RELAY""#);
        let res = r.run(0).await.unwrap();
        assert_eq!(
            res,
            TestOutcome::finished(JudgeCode::WrongAnswer, Duration::from_millis(500), "6".into())
        );
    }

    #[tokio::test]
    async fn should_pass_case_index_to_child() {
        let r = sh(
            r#"[ "$TCJUDGE_CASE" = 7 ] && [ "$TCJUDGE_NARRATE" = false ] && printf '%s' '+{"elapsed":0.0}' > "$TCJUDGE_RELAY""#,
        );
        let res = r.run(7).await.unwrap();
        assert_eq!(res.judge, JudgeCode::Correct);
    }

    #[tokio::test]
    async fn should_be_crash_when_nothing_relayed() {
        let r = sh("true");
        let res = r.run(0).await.unwrap();
        assert_eq!(res, TestOutcome::unreported());
    }

    #[tokio::test]
    async fn should_not_read_stale_result_of_previous_case() {
        let r = sh("true");
        r.get_relay()
            .send(&RelayMessage {
                judge: JudgeCode::Correct,
                execution_time: Duration::ZERO,
                produced: None,
            })
            .unwrap();
        let res = r.run(1).await.unwrap();
        assert_eq!(res.judge, JudgeCode::CrashedOrAborted);
    }

    #[tokio::test]
    async fn should_ignore_relay_after_nonzero_exit() {
        let r = sh(r#"printf '%s' '+{"elapsed":0.0}' > "$TCJUDGE_RELAY"; exit 3"#);
        let res = r.run(0).await.unwrap();
        assert_eq!(res, TestOutcome::crashed("Exit code: 3"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn should_decode_signals() {
        let res = sh("kill -s SEGV $$").run(0).await.unwrap();
        assert_eq!(res, TestOutcome::crashed("(segfault)"));

        let res = sh("kill -s FPE $$").run(0).await.unwrap();
        assert_eq!(res, TestOutcome::crashed("(arithmetic)"));

        let res = sh("kill -s TERM $$").run(0).await.unwrap();
        assert_eq!(res, TestOutcome::crashed("(killed)"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn should_kill_after_hard_limit() {
        let r = sh("sleep 5").kill_after(Some(Duration::from_millis(200)));
        let start = Instant::now();
        let res = r.run(0).await.unwrap();
        assert!(start.elapsed() < Duration::from_secs(4));
        assert_eq!(res, TestOutcome::crashed("(killed)"));
    }

    #[tokio::test]
    async fn spawn_failure_is_an_error() {
        let relay = RelaySlot::temporary().unwrap();
        let r = TestRunner::new("/nonexistent/tcjudge-child", vec![], relay);
        let err = r.run(0).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to spawn"));
    }

    #[test]
    fn recognizes_arithmetic_panics() {
        assert!(is_arithmetic_panic("attempt to divide by zero"));
        assert!(is_arithmetic_panic(
            "attempt to calculate the remainder with a divisor of zero"
        ));
        assert!(is_arithmetic_panic("attempt to multiply with overflow"));
        assert!(is_arithmetic_panic("attempt to negate with overflow"));
        assert!(!is_arithmetic_panic("index out of bounds: the len is 3"));
        assert!(!is_arithmetic_panic("buffer filled with overflow"));
        assert!(!is_arithmetic_panic("attempt to add with overflow, retrying"));
    }
}
