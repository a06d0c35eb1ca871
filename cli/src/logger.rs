use std::io::Write as _;

use colored::Colorize as _;
use env_logger::{Env, Target};
use tcjudge_core::color::{DefaultPalette, SemanticColor};

/// Logs go to stderr so they never mix with the report. Filter with
/// `RUST_LOG`, default `warn`.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Stderr)
        .format(|buf, record| {
            let level = record.level();
            writeln!(
                buf,
                "[{}] {}",
                level.to_string().color(DefaultPalette.level(level)),
                record.args()
            )
        })
        .init();
}
