use std::path::{Path, PathBuf};
use std::result::Result as StdResult;
use std::time::Duration;

use anyhow::{ensure, Context as _};
use rust_embed::RustEmbed;
use serde::Deserialize;

/// How much is printed while and after the suite runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, clap::ValueEnum, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Verbosity {
    /// Narrate every case, then print the compact report.
    #[default]
    #[value(alias = "0")]
    Full,

    /// One glyph per case as it completes, then the score.
    #[value(alias = "1")]
    Compact,

    /// Nothing live; the compact report and the score at the end.
    #[value(alias = "2")]
    Only,
}

impl Verbosity {
    /// Whether the isolated process narrates its case.
    pub fn narrates(self) -> bool {
        self == Verbosity::Full
    }

    /// Whether a progress spinner may be drawn while a case runs. Compact
    /// mode keeps its glyphs on the current line, which clearing a spinner
    /// would erase.
    pub fn shows_spinner(self) -> bool {
        self == Verbosity::Only
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    pub report: ReportConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub verbosity: Verbosity,
    pub color: bool,
    pub max_width: usize,
    pub bar_width: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seconds.
    pub time_limit: f64,
    /// Seconds. Off unless set.
    pub kill_after: Option<f64>,
    pub relay_path: Option<PathBuf>,
    pub strict_exit: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Full,
            color: true,
            max_width: 73,
            bar_width: 73,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            time_limit: 2.0,
            kill_after: None,
            relay_path: None,
            strict_exit: false,
        }
    }
}

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

impl Config {
    pub const FILENAME: &str = "tcjudge.toml";
    pub const APP_NAME: &str = "tcjudge";

    pub fn example_toml() -> anyhow::Result<String> {
        let file = Asset::get(Self::FILENAME).context("Example config is not embedded")?;
        let s = std::str::from_utf8(file.data.as_ref()).context("Example config is not UTF-8")?;
        Ok(s.to_owned())
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: PathBuf) -> anyhow::Result<Self> {
        let toml = std::fs::read_to_string(&filepath)
            .with_context(|| format!("Cannot read config {:?}", filepath))?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;
        cfg.source_config_file = Some(filepath);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Find config file in ancestor dirs, including current dir.
    pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>) -> Option<PathBuf> {
        cur_dir
            .as_ref()
            .ancestors()
            .map(|dir| dir.join(Self::FILENAME))
            .find(|path| path.is_file())
    }

    pub fn user_config_file() -> Option<PathBuf> {
        let path = dirs::config_dir()?.join(Self::APP_NAME).join(Self::FILENAME);
        path.is_file().then_some(path)
    }

    /// Explicit file, else the nearest `tcjudge.toml`, else the user config,
    /// else defaults.
    pub fn load(explicit: Option<&Path>, cur_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let found = match explicit {
            Some(path) => Some(path.to_owned()),
            None => Self::find_file_in_ancestors(cur_dir).or_else(Self::user_config_file),
        };
        match found {
            Some(path) => {
                log::debug!("Loading config {:?}", path);
                Self::from_toml_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.run.time_limit.is_finite() && self.run.time_limit >= 0.0,
            "run.time_limit must be a non-negative number of seconds (got {})",
            self.run.time_limit
        );
        if let Some(k) = self.run.kill_after {
            ensure!(
                k.is_finite() && k > 0.0,
                "run.kill_after must be a positive number of seconds (got {})",
                k
            );
        }
        ensure!(
            self.report.max_width > 3,
            "report.max_width must be greater than 3 (got {})",
            self.report.max_width
        );
        Ok(())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.run.time_limit).unwrap_or(Duration::MAX)
    }

    pub fn kill_after(&self) -> Option<Duration> {
        self.run
            .kill_after
            .and_then(|k| Duration::try_from_secs_f64(k).ok())
    }
}
