//! Sample problems bundled with `tcjudge-demo`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tcjudge_core::{Problem, TestTable, Testcase};

#[derive(Default)]
pub struct Doubler;

impl Problem for Doubler {
    const NAME: &'static str = "Doubler";
    type Input = (i64,);
    type Output = i64;

    fn solve(&mut self, (x,): (i64,)) -> i64 {
        x * 2
    }
}

impl Doubler {
    /// Case 1 expects the wrong value on purpose; case 2 is disabled.
    pub fn table() -> TestTable<Self> {
        vec![
            Testcase::new((2,), 4),
            Testcase::new((3,), 5),
            Testcase::new((10,), 20),
        ]
    }

    pub fn disabled(i: usize) -> bool {
        i == 2
    }
}

#[derive(Default)]
pub struct Average;

impl Problem for Average {
    const NAME: &'static str = "Average";
    type Input = (Vec<f64>,);
    type Output = f64;

    fn solve(&mut self, (xs,): (Vec<f64>,)) -> f64 {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

impl Average {
    pub fn table() -> TestTable<Self> {
        vec![
            Testcase::new((vec![1.0, 2.0],), 1.5),
            Testcase::new((vec![0.1, 0.2],), 0.15 + 1e-12),
            Testcase::unknown((vec![1.0, 2.0, 4.0],)),
            Testcase::new((vec![3.0],), 3.0),
        ]
    }
}

#[derive(Default)]
pub struct Divider;

impl Problem for Divider {
    const NAME: &'static str = "Divider";
    type Input = (i64, i64);
    type Output = i64;

    fn solve(&mut self, (a, b): (i64, i64)) -> i64 {
        a / b
    }
}

impl Divider {
    pub fn table() -> TestTable<Self> {
        vec![
            Testcase::new((10, 2), 5),
            Testcase::new((1, 0), 0),
            Testcase::new((9, 3), 3),
        ]
    }
}

static SOLVED: AtomicUsize = AtomicUsize::new(0);

/// Misbehaves on request. Returns how many cases this process has solved,
/// which stays 1 as long as every case gets its own process.
#[derive(Default)]
pub struct Chaos;

impl Problem for Chaos {
    const NAME: &'static str = "Chaos";
    type Input = (String,);
    type Output = usize;

    fn solve(&mut self, (mode,): (String,)) -> usize {
        match mode.as_str() {
            "panic" => panic!("chaos requested a panic"),
            "abort" => std::process::abort(),
            "exit" => std::process::exit(7),
            "index" => {
                let v: Vec<usize> = Vec::new();
                v[mode.len()]
            }
            _ => SOLVED.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }
}

impl Chaos {
    pub fn table() -> TestTable<Self> {
        let modes = ["ok", "panic", "ok", "abort", "exit", "index", "ok"];
        modes
            .iter()
            .map(|&m| Testcase::new((m.to_owned(),), 1))
            .collect()
    }
}

#[derive(Default)]
pub struct Sleeper;

impl Problem for Sleeper {
    const NAME: &'static str = "Sleeper";
    type Input = (u64,);
    type Output = u64;

    fn solve(&mut self, (millis,): (u64,)) -> u64 {
        std::thread::sleep(Duration::from_millis(millis));
        millis
    }
}

impl Sleeper {
    pub fn table() -> TestTable<Self> {
        vec![
            Testcase::new((0,), 0),
            Testcase::new((300,), 300),
            Testcase::new((3000,), 3000),
        ]
    }
}

#[derive(Default)]
pub struct Echo;

impl Problem for Echo {
    const NAME: &'static str = "Echo";
    type Input = (String, usize);
    type Output = String;

    fn solve(&mut self, (s, n): (String, usize)) -> String {
        s.repeat(n)
    }
}

impl Echo {
    pub fn table() -> TestTable<Self> {
        vec![
            Testcase::new(("ab".to_owned(), 2), "abab".to_owned()),
            Testcase::new(("xyz".to_owned(), 40), "short".to_owned()),
            Testcase::unknown(("line\n".to_owned(), 2)),
        ]
    }
}
