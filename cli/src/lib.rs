pub mod cmd;
pub mod config;
pub mod logger;

pub use cmd::{launch, TesterArgs};
