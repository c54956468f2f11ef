//! Stateless progress reporting.
//!
//! The controller hands over raw numbers on a fixed cadence; everything
//! derived (percent, throughput, ETA) is computed here so the hot loop never
//! touches formatting or division.

use std::fmt;
use std::time::Duration;

/// One point-in-time view of a running search.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub attempts: u64,
    pub total: u64,
    pub elapsed: Duration,
    pub candidate: String,
}

impl ProgressSnapshot {
    pub fn new(attempts: u64, total: u64, elapsed: Duration, candidate: &str) -> Self {
        Self {
            attempts,
            total,
            elapsed,
            candidate: candidate.to_owned(),
        }
    }

    /// Completion percentage in `[0, 100]`.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.attempts as f64 / self.total as f64 * 100.0
    }

    /// Candidates tested per second, or `None` before any time has elapsed.
    pub fn throughput(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { Some(self.attempts as f64 / secs) } else { None }
    }

    /// Estimated time to sweep the remainder of the space, or `None` when no
    /// throughput is available yet.
    pub fn eta(&self) -> Option<Duration> {
        let rate = self.throughput()?;
        if rate <= 0.0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.attempts) as f64;
        Some(Duration::from_secs_f64(remaining / rate))
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:6.2}% | {}/{} | candidate: {} | ",
            self.percent(),
            self.attempts,
            self.total,
            self.candidate,
        )?;
        match self.throughput() {
            Some(rate) => write!(f, "{rate:.0} pwd/s")?,
            None => write!(f, "n/a pwd/s")?,
        }
        write!(f, " | elapsed: {:.1}s | eta: ", self.elapsed.as_secs_f64())?;
        match self.eta() {
            Some(eta) => write!(f, "{:.1}min", eta.as_secs_f64() / 60.0),
            None => write!(f, "n/a"),
        }
    }
}
