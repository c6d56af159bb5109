use thiserror::Error;
use tracing::error;

/// Raised when the circuit breaker trips; propagates out of the refresh
/// loop and takes the process down with a non-zero exit.
#[derive(Debug, Error)]
#[error("maximum number of intervals with errors exceeded")]
pub struct ThresholdExceeded;

/// Fail-fast circuit breaker against sustained upstream outages.
///
/// Counts refresh intervals in which at least one error was recorded. The
/// count survives across cycles and only resets once a cycle completes
/// without any error. Exceeding the configured maximum is terminal.
#[derive(Debug)]
pub struct ErrorTracker {
    intervals_with_errors: u32,
    max_intervals_with_errors: u32,
    errored_this_cycle: bool,
}

impl ErrorTracker {
    pub fn new(max_intervals_with_errors: u32) -> Self {
        Self {
            intervals_with_errors: 0,
            max_intervals_with_errors,
            errored_this_cycle: false,
        }
    }

    /// Record one cycle error. Logs it, bumps the interval count and trips
    /// the breaker when the count exceeds the configured maximum.
    pub fn process_error(&mut self, msg: &str) -> Result<(), ThresholdExceeded> {
        error!("{msg}");
        self.errored_this_cycle = true;
        self.intervals_with_errors += 1;
        if self.intervals_with_errors > self.max_intervals_with_errors {
            error!("Maximum number of intervals with errors exceeded, exiting.");
            return Err(ThresholdExceeded);
        }
        Ok(())
    }

    /// Cycle boundary: a cycle that saw no error resets the running count,
    /// so transient blips do not accumulate toward the threshold.
    pub fn finish_cycle(&mut self) {
        if !self.errored_this_cycle {
            self.intervals_with_errors = 0;
        }
        self.errored_this_cycle = false;
    }

    #[cfg(test)]
    pub fn intervals_with_errors(&self) -> u32 {
        self.intervals_with_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_errors_do_not_trip() {
        let mut tracker = ErrorTracker::new(3);
        for _ in 0..3 {
            tracker.process_error("boom").expect("under threshold");
        }
        assert_eq!(tracker.intervals_with_errors(), 3);
    }

    #[test]
    fn max_plus_one_trips() {
        let mut tracker = ErrorTracker::new(3);
        for _ in 0..3 {
            tracker.process_error("boom").expect("under threshold");
        }
        assert!(tracker.process_error("boom").is_err());
    }

    #[test]
    fn zero_tolerance_trips_on_first_error() {
        let mut tracker = ErrorTracker::new(0);
        assert!(tracker.process_error("boom").is_err());
    }

    #[test]
    fn clean_cycle_resets_count() {
        let mut tracker = ErrorTracker::new(2);
        tracker.process_error("boom").unwrap();
        tracker.finish_cycle(); // errored cycle, count kept
        assert_eq!(tracker.intervals_with_errors(), 1);

        tracker.finish_cycle(); // clean cycle, count reset
        assert_eq!(tracker.intervals_with_errors(), 0);

        // breaker now needs the full run of errors again
        tracker.process_error("boom").unwrap();
        tracker.process_error("boom").unwrap();
        assert!(tracker.process_error("boom").is_err());
    }

    #[test]
    fn errored_cycle_does_not_reset() {
        let mut tracker = ErrorTracker::new(5);
        tracker.process_error("boom").unwrap();
        tracker.process_error("boom").unwrap();
        tracker.finish_cycle();
        assert_eq!(tracker.intervals_with_errors(), 2);
    }
}
