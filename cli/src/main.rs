mod demo;

use clap::Parser;
use tcjudge_cli::{launch, logger, TesterArgs};
use tcjudge_core::testing::none_disabled;

/// Runs one of the bundled sample problems through tcjudge.
#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
struct DemoArgs {
    #[command(subcommand)]
    problem: DemoProblem,
}

#[derive(Debug, clap::Subcommand)]
enum DemoProblem {
    /// x * 2, with one wrong expectation and one disabled case
    Doubler(TesterArgs),
    /// Mean of floats, compared with tolerance; one case has no oracle
    Average(TesterArgs),
    /// Integer division, including by zero
    Divider(TesterArgs),
    /// Panics, aborts and exits on request
    Chaos(TesterArgs),
    /// Sleeps for the given number of milliseconds
    Sleeper(TesterArgs),
    /// Repeats a string
    Echo(TesterArgs),
}

impl DemoArgs {
    async fn exec(&self) -> anyhow::Result<i32> {
        use DemoProblem::*;
        match &self.problem {
            Doubler(args) => {
                launch::<demo::Doubler>(&demo::Doubler::table(), &demo::Doubler::disabled, args)
                    .await
            }
            Average(args) => {
                launch::<demo::Average>(&demo::Average::table(), &none_disabled, args).await
            }
            Divider(args) => {
                launch::<demo::Divider>(&demo::Divider::table(), &none_disabled, args).await
            }
            Chaos(args) => {
                launch::<demo::Chaos>(&demo::Chaos::table(), &none_disabled, args).await
            }
            Sleeper(args) => {
                launch::<demo::Sleeper>(&demo::Sleeper::table(), &none_disabled, args).await
            }
            Echo(args) => {
                launch::<demo::Echo>(&demo::Echo::table(), &none_disabled, args).await
            }
        }
    }
}

#[tokio::main]
async fn main() {
    logger::init();
    let app = DemoArgs::parse();
    let code = app.exec().await.unwrap_or_else(|e| {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    });
    std::process::exit(code);
}
