use std::collections::BTreeMap;
use std::time::Duration;

use crossterm::terminal;

use crate::color::{Palette, Tone};
use crate::testing::{index_width, JudgeCode, TestOutcome};

const ESC: char = '\x1b';
const RESET: &str = "\x1b[0m";
const ELLIPSIS: &str = "...";

/// Case index right-aligned to the width of the largest index.
pub fn case_num(index: usize, num_cases: usize) -> String {
    format!("{:>w$}", index, w = index_width(num_cases))
}

pub fn secs(d: Duration) -> String {
    format!("{:.2}", d.as_secs_f64())
}

/// Length of `s` as printed: ANSI color sequences (`ESC ... m`) excluded.
pub fn printable_len(s: &str) -> usize {
    let mut len = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if c == ESC {
            in_escape = true;
        } else if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else {
            len += 1;
        }
    }
    len
}

/// Cuts `line` to `max_width` printable characters, the last three being
/// `...`. Escape sequences are kept and do not count towards the width.
pub fn truncate_printable(line: &str, max_width: usize) -> String {
    if printable_len(line) <= max_width {
        return line.to_owned();
    }
    let keep = max_width.saturating_sub(ELLIPSIS.len());

    let mut res = String::with_capacity(line.len());
    let mut printed = 0;
    let mut in_escape = false;
    let mut saw_escape = false;
    for c in line.chars() {
        if c == ESC {
            in_escape = true;
            saw_escape = true;
            res.push(c);
        } else if in_escape {
            in_escape = c != 'm';
            res.push(c);
        } else if printed < keep {
            printed += 1;
            res.push(c);
        } else {
            break;
        }
    }
    res.push_str(ELLIPSIS);
    if saw_escape {
        res.push_str(RESET);
    }
    res
}

/// ` t<idx>: <glyph>[ (<secs>s)][ [<produced>]][ <tag>]`, truncated to
/// `max_width` printable characters.
pub fn report_line(
    palette: &Palette,
    index: usize,
    num_cases: usize,
    outcome: &TestOutcome,
    max_width: usize,
) -> String {
    let mut line = format!(
        " {}: {}",
        palette.paint(&format!("t{}", case_num(index, num_cases)), Tone::Highlight),
        palette.glyph(outcome.judge),
    );
    if let Some(t) = outcome.execution_time {
        line += &format!(" ({}s)", secs(t));
    }
    match (outcome.judge, &outcome.diagnostic) {
        (JudgeCode::WrongAnswer | JudgeCode::Unknown, Some(produced)) => {
            line += &format!(" [{}]", produced);
        }
        (JudgeCode::CrashedOrAborted, Some(tag)) => {
            line += &format!(" {}", tag);
        }
        _ => {}
    }
    self::truncate_printable(&line, max_width)
}

/// The `=====` separator between narrated cases, no wider than the terminal.
pub fn bar(palette: &Palette, width: usize) -> String {
    let cols = terminal::size()
        .map(|(c, _)| c as usize)
        .unwrap_or(width);
    palette.paint(&"=".repeat(width.min(cols.max(1))), Tone::Faint)
}

/// `All N tests passed` or `k/N tests failed (X x1, E x2)`. Disabled cases
/// are not counted.
pub fn summary(palette: &Palette, judges: &[JudgeCode]) -> String {
    let count: BTreeMap<char, usize> = judges
        .iter()
        .filter(|&&j| j != JudgeCode::Disabled)
        .fold(BTreeMap::new(), |mut count, j| {
            *count.entry(j.glyph()).or_default() += 1;
            count
        });

    let num_total = count.values().sum::<usize>();
    let num_failed = judges
        .iter()
        .filter(|&&j| j != JudgeCode::Disabled && !j.is_passing())
        .count();

    if num_failed == 0 {
        return palette.paint(&format!("All {} tests passed", num_total), Tone::Pass);
    }

    let detail = count
        .iter()
        .filter_map(|(&glyph, &cnt)| {
            let judge = JudgeCode::from_glyph(glyph)?;
            (!judge.is_passing()).then(|| format!("{} x{}", palette.glyph(judge), cnt))
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} ({})",
        palette.paint(
            &format!("{}/{} tests failed", num_failed, num_total),
            Tone::Fail
        ),
        detail
    )
}
