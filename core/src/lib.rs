pub mod action;
pub mod color;
pub mod config;
pub mod score;
pub mod style;
pub mod testing;
pub mod value;

pub use crate::action::{run_suite, Scoring};
pub use crate::config::{Config, Verbosity};
pub use crate::testing::{JudgeCode, Problem, SuiteReport, TestTable, Testcase};
pub use crate::value::{Describe, TolerantEq};
