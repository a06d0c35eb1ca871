use std::time::Duration;

/// Minutes after which a submission keeps half of its decaying share.
const TT: f64 = 75.0;

/// Points kept for submitting `elapsed` after opening a problem worth
/// `points`: `points * (0.3 + 0.7 * TT^2 / (10 * PT^2 + TT^2))`, `PT` in
/// minutes. Tends to `0.3 * points`.
pub fn submission_score(points: f64, elapsed: Duration) -> f64 {
    let pt = elapsed.as_secs_f64() / 60.0;
    points * (0.3 + (0.7 * TT * TT) / (10.0 * pt * pt + TT * TT))
}

/// Elapsed time since a unix timestamp (seconds). A future timestamp counts
/// as zero.
pub fn elapsed_since(open_time: i64, now: i64) -> Duration {
    Duration::from_secs(now.saturating_sub(open_time).max(0) as u64)
}

#[cfg(test)]
mod test {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn full_score_when_opened_now() {
        assert!(approx(submission_score(250.0, Duration::ZERO), 250.0));
    }

    #[test]
    fn known_points_on_the_curve() {
        // PT = 75 minutes: 0.3 + 0.7 / 11
        let s = submission_score(500.0, Duration::from_secs(75 * 60));
        assert!(approx(s, 500.0 * (0.3 + 0.7 / 11.0)), "{s}");

        // PT = 10 minutes: 0.3 + 0.7 * 5625 / 6625
        let s = submission_score(250.0, Duration::from_secs(600));
        assert!(approx(s, 250.0 * (0.3 + 0.7 * 5625.0 / 6625.0)), "{s}");
    }

    #[test]
    fn decays_strictly_towards_thirty_percent() {
        let mut prev = f64::INFINITY;
        for minutes in [0_u64, 1, 5, 30, 60, 120, 600, 6000] {
            let s = submission_score(1000.0, Duration::from_secs(minutes * 60));
            assert!(s < prev, "not decreasing at {minutes}min");
            assert!(s > 300.0);
            prev = s;
        }
        let far = submission_score(1000.0, Duration::from_secs(1_000_000_000));
        assert!((far - 300.0).abs() < 1e-3, "{far}");
    }

    #[test]
    fn future_open_time_is_clamped() {
        assert_eq!(elapsed_since(100, 40), Duration::ZERO);
        assert_eq!(elapsed_since(100, 160), Duration::from_secs(60));
    }
}
