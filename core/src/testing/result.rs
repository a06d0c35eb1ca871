use std::time::Duration;

/// Classification of a single case. Exactly one per case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum JudgeCode {
    Correct,
    WrongAnswer,
    TimeExceeded,
    /// Ran cleanly but there is no expected output to compare with.
    Unknown,
    CrashedOrAborted,
    Disabled,
}

impl JudgeCode {
    pub fn glyph(self) -> char {
        use JudgeCode::*;
        match self {
            Correct => '+',
            WrongAnswer => 'X',
            TimeExceeded => 'T',
            Unknown => '?',
            CrashedOrAborted => 'E',
            Disabled => 'd',
        }
    }

    pub fn from_glyph(c: char) -> Option<Self> {
        use JudgeCode::*;
        Some(match c {
            '+' => Correct,
            'X' => WrongAnswer,
            'T' => TimeExceeded,
            '?' => Unknown,
            'E' => CrashedOrAborted,
            'd' => Disabled,
            _ => return None,
        })
    }

    /// Whether this code keeps the run good. Disabled cases are neutral and
    /// are filtered out before this is consulted.
    pub fn is_passing(self) -> bool {
        matches!(self, JudgeCode::Correct | JudgeCode::Unknown)
    }

    /// Codes whose report line carries the produced value.
    pub fn shows_produced(self) -> bool {
        matches!(self, JudgeCode::WrongAnswer | JudgeCode::Unknown)
    }
}

/// What one case ended up as. Built once per case, then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    pub judge: JudgeCode,
    /// `None` for disabled and crashed cases.
    pub execution_time: Option<Duration>,
    /// Rendering of the value `solve` returned, when it returned.
    pub produced: Option<String>,
    /// Produced value for `WrongAnswer`/`Unknown`, crash tag for crashes.
    pub diagnostic: Option<String>,
}

impl TestOutcome {
    pub fn disabled() -> Self {
        Self {
            judge: JudgeCode::Disabled,
            execution_time: None,
            produced: None,
            diagnostic: None,
        }
    }

    pub fn crashed(diagnostic: impl Into<String>) -> Self {
        Self {
            judge: JudgeCode::CrashedOrAborted,
            execution_time: None,
            produced: None,
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Clean exit but nothing usable in the relay slot.
    pub fn unreported() -> Self {
        Self {
            judge: JudgeCode::CrashedOrAborted,
            execution_time: None,
            produced: None,
            diagnostic: None,
        }
    }

    pub fn finished(judge: JudgeCode, execution_time: Duration, produced: String) -> Self {
        let diagnostic = judge.shows_produced().then(|| produced.clone());
        Self {
            judge,
            execution_time: Some(execution_time),
            produced: Some(produced),
            diagnostic,
        }
    }
}

/// One case as it appears in the final report.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseReport {
    pub index: usize,
    pub outcome: TestOutcome,
    /// Rendered, possibly truncated, report line.
    pub line: String,
}

/// Everything a suite run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteReport {
    pub problem: &'static str,
    pub cases: Vec<CaseReport>,
    pub good: bool,
    pub score: f64,
}

impl SuiteReport {
    /// Always 0 unless `strict`, in which case a bad run exits 1.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && !self.good {
            1
        } else {
            0
        }
    }
}

/// A run is good when every executed case passed.
pub fn is_good(judges: impl IntoIterator<Item = JudgeCode>) -> bool {
    judges
        .into_iter()
        .filter(|&j| j != JudgeCode::Disabled)
        .all(JudgeCode::is_passing)
}
