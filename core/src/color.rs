use colored::{Color, Colorize};

use crate::testing::JudgeCode;

/// The six colors a report is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Tone {
    Pass,
    Fail,
    Crossed,
    Fatal,
    Faint,
    Highlight,
}

impl Tone {
    pub fn of_judge(judge: JudgeCode) -> Option<Self> {
        use JudgeCode::*;
        match judge {
            Correct => Some(Tone::Pass),
            WrongAnswer | TimeExceeded => Some(Tone::Fail),
            Unknown => None,
            CrashedOrAborted => Some(Tone::Fatal),
            Disabled => Some(Tone::Crossed),
        }
    }
}

/// Built once at startup from the configuration. A disabled palette paints
/// nothing, which is what non-terminal output wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn paint(&self, s: &str, tone: Tone) -> String {
        if !self.enabled {
            return s.to_owned();
        }
        let painted = match tone {
            Tone::Pass => s.green().bold(),
            Tone::Fail => s.red().bold(),
            Tone::Crossed => s.white().strikethrough(),
            Tone::Fatal => s.on_red().bold(),
            Tone::Faint => s.dimmed(),
            Tone::Highlight => s.cyan().bold(),
        };
        painted.to_string()
    }

    /// The judge glyph in its color.
    pub fn glyph(&self, judge: JudgeCode) -> String {
        let glyph = judge.glyph().to_string();
        match Tone::of_judge(judge) {
            Some(tone) => self.paint(&glyph, tone),
            None => glyph,
        }
    }

    /// Final score: green when the run is good, the fatal tone otherwise.
    pub fn grade(&self, s: &str, good: bool) -> String {
        self.paint(s, if good { Tone::Pass } else { Tone::Fatal })
    }
}

pub trait SemanticColor {
    fn level(&self, level: log::Level) -> Color {
        use log::Level::*;
        match level {
            Error => self.error(),
            Warn => self.warn(),
            Info => self.info(),
            Debug => self.debug(),
            Trace => self.trace(),
        }
    }

    fn error(&self) -> Color;
    fn warn(&self) -> Color;
    fn info(&self) -> Color;
    fn debug(&self) -> Color;
    fn trace(&self) -> Color;
}

pub struct DefaultPalette;

impl SemanticColor for DefaultPalette {
    fn error(&self) -> Color {
        Color::BrightRed
    }

    fn warn(&self) -> Color {
        Color::BrightYellow
    }

    fn info(&self) -> Color {
        Color::Cyan
    }

    fn debug(&self) -> Color {
        Color::Magenta
    }

    fn trace(&self) -> Color {
        Color::Blue
    }
}
