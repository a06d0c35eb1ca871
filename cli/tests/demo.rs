use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Demo {
    dir: TempDir,
}

impl Demo {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// `tcjudge-demo <problem> --color never <args>`, run inside an empty
    /// directory so no stray tcjudge.toml is picked up.
    fn cmd(&self, problem: &str, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("tcjudge-demo").unwrap();
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .arg(problem)
            .args(["--color", "never"])
            .args(args);
        cmd
    }

    fn stdout(&self, problem: &str, args: &[&str]) -> String {
        let out = self.cmd(problem, args).assert().success();
        String::from_utf8(out.get_output().stdout.clone()).unwrap()
    }
}

fn lines(s: &str) -> Vec<&str> {
    s.lines().collect()
}

#[test]
fn only_mode_lists_each_case() {
    let demo = Demo::new();
    let out = demo.stdout("doubler", &["-v", "only"]);
    let l = lines(&out);
    assert_eq!(l[0], "Doubler");
    assert_eq!(l[1], "");
    assert!(l[2].starts_with(" t0: + ("), "{out}");
    assert!(l[3].starts_with(" t1: X ("), "{out}");
    assert!(l[3].ends_with("s) [6]"), "{out}");
    assert_eq!(l[4], " t2: d");
    assert_eq!(l[5], "");
    assert_eq!(l[6], "250.00");
}

#[test]
fn compact_mode_prints_glyphs_then_score() {
    let demo = Demo::new();
    demo.cmd("doubler", &["-v", "compact"])
        .assert()
        .success()
        .stdout("Doubler: + X d (250.00).\n");
}

#[test]
fn numeric_verbosity_aliases() {
    let demo = Demo::new();
    demo.cmd("doubler", &["-v", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Doubler: + X d "));
}

#[test]
fn full_mode_narrates_then_reports() {
    let demo = Demo::new();
    let out = demo.stdout("doubler", &[]);
    assert!(out.contains("Test 0: [2]"), "{out}");
    assert!(out.contains("Desired answer:\n\t5\nYour answer:\n\t6\n X\n"), "{out}");
    assert!(!out.contains("Test 2:"), "disabled case was run:\n{out}");
    assert!(out.contains("Doubler\n\n t0: + ("), "{out}");
    assert!(out.contains("\n t2: d\n\n250.00\n"), "{out}");
    assert!(out.trim_end().ends_with("1/2 tests failed (X x1)"), "{out}");
}

#[test]
fn disable_flag_adds_to_the_predicate() {
    let demo = Demo::new();
    demo.cmd("doubler", &["-v", "compact", "-d", "0,1"])
        .assert()
        .success()
        .stdout("Doubler: d d d (250.00).\n");
}

#[test]
fn strict_exit_reports_failure() {
    let demo = Demo::new();
    demo.cmd("doubler", &["-v", "compact", "--strict"])
        .assert()
        .code(1);
    demo.cmd("doubler", &["-v", "compact", "--strict", "-d", "1"])
        .assert()
        .success();
}

#[test]
fn score_decays_with_open_time() {
    let demo = Demo::new();
    let open = chrono_like_now() - 75 * 60;
    let out = demo.stdout("doubler", &["-v", "compact", "-s", "500", "--open-time", &open.to_string()]);
    // 500 * (0.3 + 0.7 / 11) = 181.82, minus a little for the seconds the run takes
    let score: f64 = out
        .trim_end()
        .trim_end_matches(").")
        .rsplit('(')
        .next()
        .unwrap()
        .parse()
        .unwrap();
    assert!((181.5..=181.82).contains(&score), "{out}");
}

fn chrono_like_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

#[test]
fn tolerant_floats_and_unknown_oracle() {
    let demo = Demo::new();
    let out = demo.stdout("average", &["-v", "only"]);
    let l = lines(&out);
    assert!(l[2].starts_with(" t0: + "), "{out}");
    assert!(l[3].starts_with(" t1: + "), "{out}");
    assert!(l[4].starts_with(" t2: ? "), "{out}");
    assert!(l[4].ends_with("[2.333333333]"), "{out}");
    assert!(l[5].starts_with(" t3: + "), "{out}");
}

#[cfg(unix)]
#[test]
fn division_by_zero_is_contained() {
    let demo = Demo::new();
    let out = demo.stdout("divider", &["-v", "only"]);
    let l = lines(&out);
    assert!(l[2].starts_with(" t0: + "), "{out}");
    assert_eq!(l[3], " t1: E (arithmetic)");
    assert!(l[4].starts_with(" t2: + "), "{out}");
}

#[cfg(unix)]
#[test]
fn narrated_crash_message() {
    let demo = Demo::new();
    let out = demo.stdout("divider", &[]);
    assert!(out.contains("Arithmetic error (e.g. division by zero)"), "{out}");
    assert!(out.contains("1/3 tests failed (E x1)"), "{out}");
}

#[cfg(unix)]
#[test]
fn every_case_gets_a_fresh_process() {
    let demo = Demo::new();
    let out = demo.stdout("chaos", &["-v", "only"]);
    let l = lines(&out);
    assert!(l[2].starts_with(" t0: + "), "{out}");
    assert_eq!(l[3], " t1: E (panic)");
    assert!(l[4].starts_with(" t2: + "), "state leaked between cases:\n{out}");
    assert_eq!(l[5], " t3: E (aborted)");
    assert_eq!(l[6], " t4: E Exit code: 7");
    assert_eq!(l[7], " t5: E (panic)");
    assert!(l[8].starts_with(" t6: + "), "{out}");
}

#[test]
fn slow_case_exceeds_time_limit() {
    let demo = Demo::new();
    let out = demo.stdout("sleeper", &["-v", "only", "-t", "0.1", "-d", "2"]);
    let l = lines(&out);
    assert!(l[2].starts_with(" t0: + "), "{out}");
    assert!(l[3].starts_with(" t1: T ("), "{out}");
    assert_eq!(l[4], " t2: d");
}

#[cfg(unix)]
#[test]
fn kill_after_stops_a_hung_case() {
    let demo = Demo::new();
    let out = demo.stdout("sleeper", &["-v", "only", "--kill-after", "1"]);
    let l = lines(&out);
    assert!(l[3].starts_with(" t1: + "), "{out}");
    assert_eq!(l[4], " t2: E (killed)");
}

#[test]
fn long_answers_are_truncated() {
    let demo = Demo::new();
    let out = demo.stdout("echo", &["-v", "only"]);
    let l = lines(&out);
    assert!(l[3].starts_with(" t1: X "), "{out}");
    assert_eq!(l[3].len(), 73);
    assert!(l[3].ends_with("..."), "{out}");
}

#[test]
fn missing_explicit_config_fails() {
    let demo = Demo::new();
    demo.cmd("echo", &["--config", "nowhere.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot read config"));
}

#[test]
fn max_width_from_config_file() {
    let demo = Demo::new();
    std::fs::write(
        demo.dir.path().join("tcjudge.toml"),
        "[report]\nverbosity = \"only\"\nmax_width = 30\n",
    )
    .unwrap();
    let out = demo.stdout("echo", &[]);
    let l = lines(&out);
    assert_eq!(l[3].len(), 30, "{out}");
    assert!(l[3].ends_with("..."), "{out}");
}

#[test]
fn invalid_config_fails() {
    let demo = Demo::new();
    let path = demo.dir.path().join("broken.toml");
    std::fs::write(&path, "[report\nverbosity = 3").unwrap();
    demo.cmd("doubler", &["--config", path.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config TOML"));
}

#[test]
fn prints_example_config() {
    let demo = Demo::new();
    demo.cmd("doubler", &["--example-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[report]").and(predicate::str::contains("[run]")));
}

#[test]
fn logs_which_config_was_loaded() {
    let demo = Demo::new();
    std::fs::write(demo.dir.path().join("tcjudge.toml"), "[report]\nverbosity = \"only\"\n")
        .unwrap();
    demo.cmd("doubler", &[])
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stderr(predicate::str::contains("Using config").and(predicate::str::contains("tcjudge.toml")));
}
