use std::{process::ExitStatus, time::Duration};

use super::result::JudgeCode;

/// Exit code of a Rust process whose main thread panicked.
pub const PANIC_EXIT_CODE: i32 = 101;

/// How the process hosting a case ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Clean,
    Exited(i32),
    Signaled(i32),
}

impl Termination {
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            return Termination::Clean;
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(sig) = status.signal() {
                return Termination::Signaled(sig);
            }
        }
        Termination::Exited(status.code().unwrap_or(-1))
    }

    pub fn is_abnormal(self) -> bool {
        self != Termination::Clean
    }
}

/// Everything the classifier looks at for one executed case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub termination: Termination,
    /// Always true when there is no oracle.
    pub correct: bool,
    pub execution_time: Duration,
    pub time_limit: Duration,
    pub has_oracle: bool,
}

/// Priority: crash > wrong answer > time exceeded > no oracle > correct.
/// Disabled cases never reach here.
pub fn classify(obs: &Observation) -> JudgeCode {
    use JudgeCode::*;
    if obs.termination.is_abnormal() {
        CrashedOrAborted
    } else if !obs.correct {
        WrongAnswer
    } else if obs.execution_time > obs.time_limit {
        TimeExceeded
    } else if !obs.has_oracle {
        Unknown
    } else {
        Correct
    }
}

/// Human readable explanation of an abnormal termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashDiagnostic {
    /// Printed in narration.
    pub message: String,
    /// Short form for the report line, e.g. `(segfault)`.
    pub tag: String,
}

impl CrashDiagnostic {
    fn new(message: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tag: tag.into(),
        }
    }

    fn same(s: String) -> Self {
        Self {
            message: s.clone(),
            tag: s,
        }
    }
}

/// `None` for a clean exit. Unrecognized signals and exit codes still get a
/// generic diagnostic.
pub fn diagnose(termination: Termination) -> Option<CrashDiagnostic> {
    match termination {
        Termination::Clean => None,
        Termination::Signaled(sig) => Some(
            self::known_signal(sig)
                .unwrap_or_else(|| CrashDiagnostic::same(format!("Signal: {}", sig))),
        ),
        Termination::Exited(PANIC_EXIT_CODE) => {
            Some(CrashDiagnostic::new("Program panicked.", "(panic)"))
        }
        Termination::Exited(code) => Some(CrashDiagnostic::same(format!("Exit code: {}", code))),
    }
}

#[cfg(unix)]
fn known_signal(sig: i32) -> Option<CrashDiagnostic> {
    let d = match sig {
        libc::SIGSEGV => CrashDiagnostic::new("Segmentation fault.", "(segfault)"),
        libc::SIGABRT => CrashDiagnostic::new("Program aborted.", "(aborted)"),
        libc::SIGFPE => CrashDiagnostic::new(
            "Arithmetic error (e.g. division by zero)",
            "(arithmetic)",
        ),
        libc::SIGINT => CrashDiagnostic::same("SIGINT".to_owned()),
        libc::SIGTERM => CrashDiagnostic::new("Killed by another process", "(killed)"),
        libc::SIGKILL => CrashDiagnostic::new("Killed.", "(killed)"),
        _ => return None,
    };
    Some(d)
}

#[cfg(not(unix))]
fn known_signal(_sig: i32) -> Option<CrashDiagnostic> {
    None
}
