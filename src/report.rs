//! Timing and outcome reporting for a batch run

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Result of running one control file
#[derive(Debug, Clone)]
pub struct WorkerOutcome {
    pub worker: usize,
    pub config: PathBuf,
    pub year_begin: i32,
    pub year_end: i32,
    pub elapsed: Duration,
    /// Failure message, `None` when the converter succeeded
    pub error: Option<String>,
}

impl WorkerOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate timing and outcomes for a whole batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    /// Outcomes ordered by worker index
    pub outcomes: Vec<WorkerOutcome>,
    /// Wall-clock time for the whole batch, including file generation
    pub total: Duration,
}

impl BatchReport {
    /// Create a report, sorting outcomes by worker index
    #[must_use]
    pub fn new(
        started_at: DateTime<Utc>,
        mut outcomes: Vec<WorkerOutcome>,
        total: Duration,
    ) -> Self {
        outcomes.sort_by_key(|o| o.worker);
        Self {
            started_at,
            outcomes,
            total,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Total runtime in hours, rounded to three decimals
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        round3(self.total.as_secs_f64() / 3600.0)
    }

    /// Slowest worker, which bounds the batch's wall-clock time
    #[must_use]
    pub fn slowest(&self) -> Option<&WorkerOutcome> {
        self.outcomes.iter().max_by_key(|o| o.elapsed)
    }

    /// Print a per-worker table and the total runtime
    pub fn print_summary(&self) {
        println!("\n===== Batch Summary =====");
        println!("Started: {}", self.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
        for outcome in &self.outcomes {
            let status = match &outcome.error {
                None => "ok".to_string(),
                Some(msg) => format!("FAILED ({msg})"),
            };
            println!(
                "- worker {:>3} [{}-{}] {:>10.3}s  {}",
                outcome.worker,
                outcome.year_begin,
                outcome.year_end,
                outcome.elapsed.as_secs_f64(),
                status
            );
        }
        println!(
            "Workers: {} succeeded, {} failed",
            self.succeeded(),
            self.failed()
        );
        println!("Total runtime: {} hrs", self.total_hours());
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(worker: usize, secs: u64, error: Option<&str>) -> WorkerOutcome {
        WorkerOutcome {
            worker,
            config: PathBuf::from(format!("proc_{worker}.cfg")),
            year_begin: 1950,
            year_end: 1951,
            elapsed: Duration::from_secs(secs),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn counts_and_orders_outcomes() {
        let report = BatchReport::new(
            Utc::now(),
            vec![
                outcome(2, 5, None),
                outcome(0, 9, Some("exit 1")),
                outcome(1, 3, None),
            ],
            Duration::from_secs(10),
        );

        let workers: Vec<usize> = report.outcomes.iter().map(|o| o.worker).collect();
        assert_eq!(workers, vec![0, 1, 2]);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert_eq!(report.slowest().map(|o| o.worker), Some(0));
    }

    #[test]
    fn total_hours_rounds_to_three_decimals() {
        let report = BatchReport::new(Utc::now(), Vec::new(), Duration::from_secs(5400));
        assert_eq!(report.total_hours(), 1.5);

        let report = BatchReport::new(Utc::now(), Vec::new(), Duration::from_secs(100));
        assert_eq!(report.total_hours(), 0.028);
    }
}
