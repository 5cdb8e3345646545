use std::fmt;

use crate::dispatch::TrialFailure;

/// Failures listed individually in the summary before the rest are counted.
const LISTED_FAILURES: usize = 10;

/// What a run did.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub planned: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub store_rows_before: usize,
    pub store_rows_after: usize,
    pub failures: Vec<TrialFailure>,
}

impl RunSummary {
    /// Did every planned trial produce a row?
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.cancelled == 0
    }

    pub fn rows_added(&self) -> usize {
        self.store_rows_after.saturating_sub(self.store_rows_before)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trials planned:   {}", self.planned)?;
        writeln!(f, "Succeeded:        {}", self.succeeded)?;
        writeln!(f, "Failed:           {}", self.failed)?;
        writeln!(f, "Cancelled:        {}", self.cancelled)?;
        write!(
            f,
            "Store rows:       {} -> {}",
            self.store_rows_before, self.store_rows_after
        )?;
        if !self.failures.is_empty() {
            write!(f, "\nFailures:")?;
            for failure in self.failures.iter().take(LISTED_FAILURES) {
                write!(f, "\n  - {}", failure)?;
            }
            if self.failures.len() > LISTED_FAILURES {
                write!(
                    f,
                    "\n  ... and {} more",
                    self.failures.len() - LISTED_FAILURES
                )?;
            }
        }
        Ok(())
    }
}
