use std::io::IsTerminal as _;
use std::path::Path;

use anyhow::Context as _;
use tcjudge_core::Config;

use crate::cmd::{ColorChoice, TesterArgs};

/// File config with flags layered on top.
pub fn load_with_args(args: &TesterArgs, cur_dir: impl AsRef<Path>) -> anyhow::Result<Config> {
    let cfg = Config::load(args.config.as_deref(), cur_dir)?;
    let cfg = with_args(cfg, args, std::io::stdout().is_terminal());
    cfg.validate().context("Invalid settings")?;
    Ok(cfg)
}

pub fn with_args(mut cfg: Config, args: &TesterArgs, stdout_is_terminal: bool) -> Config {
    let TesterArgs {
        verbosity,
        time_limit,
        kill_after,
        score: _,
        open_time: _,
        disable: _,
        color,
        relay_path,
        strict,
        config: _,
        example_config: _,
    } = args;

    if let Some(v) = verbosity {
        cfg.report.verbosity = *v;
    }
    if let Some(t) = time_limit {
        cfg.run.time_limit = *t;
    }
    if kill_after.is_some() {
        cfg.run.kill_after = *kill_after;
    }
    if relay_path.is_some() {
        cfg.run.relay_path = relay_path.clone();
    }
    cfg.run.strict_exit |= *strict;
    cfg.report.color = match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cfg.report.color && stdout_is_terminal,
    };
    cfg
}
